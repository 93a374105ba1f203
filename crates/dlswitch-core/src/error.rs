/// All errors that can occur within dlswitch.
///
/// The fatal helpers (`dispatch`, `check_success!`) panic with the `Display`
/// text of these variants; the `try_*` twins return them instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A descriptor matched no arm of the dispatch table.
    #[error("{context} failed to dispatch data type {code} {bits}")]
    UnsupportedDType {
        context: String,
        code: u8,
        bits: u8,
        lanes: u16,
    },

    /// The device runtime reported a non-success status.
    #[error("CUDA Failure: {message}")]
    DeviceRuntime { message: String },

    /// Raw type code outside the DLPack enum.
    #[error("invalid DLPack type code {0}")]
    InvalidTypeCode(u8),

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout dlswitch.
pub type Result<T> = std::result::Result<T, Error>;

/// Early return with a formatted error message.
/// Usage: `bail!("no stream for {}", device)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
