use thiserror::Error;

/// Uniform error definition for the status client.
#[derive(Debug, Error)]
pub enum QueryErr {
    /// Unintended data from the server, or input that cannot be used.
    #[error("{0}")]
    DataErr(String),
    /// Internal errors, including clock and type conversion failures.
    #[error("{0}")]
    InternalErr(String),
    /// Errors raised by the socket.
    #[error("{0}")]
    IoErr(#[from] std::io::Error),
}

impl From<std::time::SystemTimeError> for QueryErr {
    fn from(err: std::time::SystemTimeError) -> Self {
        QueryErr::InternalErr(err.to_string())
    }
}

impl From<serde_json::Error> for QueryErr {
    fn from(err: serde_json::Error) -> Self {
        QueryErr::DataErr(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for QueryErr {
    fn from(err: std::string::FromUtf8Error) -> Self {
        QueryErr::DataErr(err.to_string())
    }
}
