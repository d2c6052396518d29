//! Frame definitions
//!
//! A single RESP2 value, as sent or received.

/// One RESP2 value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `+OK`
    Simple(String),

    /// `-ERR ...`, a protocol-level rejection from the server
    Error(String),

    /// `:42`
    Integer(i64),

    /// `$n` followed by n raw bytes
    Bulk(Vec<u8>),

    /// `$-1`, the absent value
    Null,

    /// `*n` followed by n frames
    Array(Vec<Frame>),

    /// `*-1`
    NullArray,
}

impl Frame {
    /// Build a bulk frame from anything byte-like
    pub fn bulk(bytes: impl AsRef<[u8]>) -> Self {
        Frame::Bulk(bytes.as_ref().to_vec())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Frame::Null | Frame::NullArray)
    }

    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Simple(_) => "simple string",
            Frame::Error(_) => "error",
            Frame::Integer(_) => "integer",
            Frame::Bulk(_) => "bulk string",
            Frame::Null => "null",
            Frame::Array(_) => "array",
            Frame::NullArray => "null array",
        }
    }
}
