//! WinAnsi (Windows-1252) encoding used for simple-font text in PDF content
//! streams. Characters outside the code page are replaced with `?`.

/// Code points for bytes 0x80..=0x9F; `None` marks undefined positions.
const HIGH_CONTROL_RANGE: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

pub const REPLACEMENT_BYTE: u8 = b'?';

/// The character a WinAnsi byte represents, if any.
pub fn win_ansi_to_char(byte: u8) -> Option<char> {
    match byte {
        0x20..=0x7E | 0xA0..=0xFF => Some(byte as char),
        0x80..=0x9F => HIGH_CONTROL_RANGE[(byte - 0x80) as usize],
        _ => None,
    }
}

pub fn char_to_win_ansi(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u8),
        _ => HIGH_CONTROL_RANGE
            .iter()
            .position(|candidate| *candidate == Some(c))
            .map(|idx| 0x80 + idx as u8),
    }
}

/// Encodes `text` as WinAnsi bytes. Tabs become spaces; anything else that
/// cannot be represented becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            _ => char_to_win_ansi(c).unwrap_or(REPLACEMENT_BYTE),
        })
        .collect()
}
