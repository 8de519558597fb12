use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("datagram is not valid UTF-8")]
    InvalidUtf8,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("expected 3 comma-separated fields, got {0}")]
    FieldCount(usize),
    #[error("field '{field}' is not an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },
    #[error("field '{field}' out of range: {value} (max {max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: u16,
    },
}
