//! Common errors and macros.

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// General error. Returned when code violates the normal workflow of
    /// encoding or decoding a stream.
    General(String),
    /// When the stream is known to be out of spec.
    OutOfSpec(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::General(message) => {
                write!(fmt, "{}", message)
            }
            Error::OutOfSpec(message) => {
                write!(fmt, "{}", message)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::General(format!("underlying IO error: {}", e))
    }
}

/// A specialized `Result` for this crate's errors.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! general_err {
    ($fmt:expr) => (crate::error::Error::General($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::error::Error::General(format!($fmt, $($args),*)));
}

macro_rules! oos_err {
    ($fmt:expr) => (crate::error::Error::OutOfSpec($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::error::Error::OutOfSpec(format!($fmt, $($args),*)));
}
