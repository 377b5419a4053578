/// Result alias that carries the custom [`VisualiserError`] type.
pub type Result<T> = std::result::Result<T, VisualiserError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum VisualiserError {
    /// Free-form error used at the application boundary where no richer
    /// variant applies.
    #[error("{0}")]
    Message(String),
    /// A caller-supplied value was outside the supported range.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Forwarded FFT processing failure.
    #[error(transparent)]
    Fft(#[from] realfft::FftError),
}

impl VisualiserError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for VisualiserError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for VisualiserError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
