use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Style names must not be empty")]
    EmptyName,
    #[error("Style '{0}' has an empty font family")]
    EmptyFontFamily(String),
    #[error("Style '{style}' has invalid font size {size}; expected a positive finite value")]
    InvalidFontSize { style: String, size: f32 },
    #[error("Style '{style}' has invalid leading {leading}; expected a positive finite value")]
    InvalidLeading { style: String, leading: f32 },
    #[error("Style '{style}' has invalid spacing {value}; expected a non-negative finite value")]
    InvalidSpacing { style: String, value: f32 },
    #[error("Invalid table style: {0}")]
    InvalidTableStyle(String),
    #[error("A style named '{0}' is already registered")]
    DuplicateStyle(String),
    #[error("No style named '{0}' is registered")]
    UnknownStyle(String),
}
