pub mod encoding;
pub mod wrapper;

pub use encoding::{encode_win_ansi, win_ansi_to_char};
pub use wrapper::{wrap_text, Line};
