use std::error::Error;
use std::fmt;
use std::io;

/// Enumeration of all possible errors that can occur while demuxing
#[derive(Debug)]
pub enum DemuxError {
    Parse(ParseError),
    Other(io::Error),
}

/// Container structure errors
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DemuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemuxError::Parse(err) => write!(f, "Parse error: {}", err),
            DemuxError::Other(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for DemuxError {}
impl Error for ParseError {}

// Conversion implementations
impl From<io::Error> for DemuxError {
    fn from(err: io::Error) -> Self {
        DemuxError::Other(err)
    }
}

impl From<ParseError> for DemuxError {
    fn from(err: ParseError) -> Self {
        DemuxError::Parse(err)
    }
}

// Conversion to io::Error for callers that funnel everything through io
impl From<DemuxError> for io::Error {
    fn from(err: DemuxError) -> Self {
        io::Error::other(err)
    }
}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> Self {
        io::Error::other(err)
    }
}

// Type alias for Result with DemuxError
pub type DemuxResult<T> = Result<T, DemuxError>;
