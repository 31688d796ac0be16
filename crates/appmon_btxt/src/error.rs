//! Error types that can be emitted from this library
//!

use derive_more::derive::Display;
use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// The data does not follow the BTXT layout
    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    /// The data ended before a complete structure could be read
    #[error("unexpected end of data at offset {offset:#x} while reading {context}")]
    TruncatedData {
        /// Offset from the start of the stream where the read began
        offset: u64,
        /// What was being read
        context: &'static str,
    },

    /// The in-memory file disagrees with itself or with what the format can hold
    #[error(transparent)]
    #[diagnostic(transparent)]
    Consistency(#[from] ConsistencyError),

    /// Text could not be represented in the charset of its block
    #[error(transparent)]
    #[diagnostic(transparent)]
    Encoding(#[from] EncodingError),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    Document(#[from] serde_json::Error),
}

/// Error type to provide further information when the data is not a valid BTXT file
#[derive(Error, Diagnostic, Debug)]
pub enum FormatError {
    /// not a BTXT file
    #[error("not a BTXT file (found signature {found:02X?})")]
    #[diagnostic(help("BTXT files start with 00 00 00 00 24 10 12 FF"))]
    BadMagic {
        /// The first eight bytes of the stream
        found: [u8; 8],
    },

    /// invalid offset range
    #[error("invalid offset range for entry {index}: end {end:#x} is before start {start:#x}")]
    InvalidOffsetRange {
        /// Position of the pair in the offset table
        index: usize,
        /// Start offset as stored
        start: u32,
        /// End offset as stored
        end: u32,
    },

    /// declared string count does not match the label metadata
    #[error("header declares {declared} strings but the label metadata describes {actual}")]
    StringCountMismatch {
        /// The string count stored in the header
        declared: u16,
        /// The number of strings described by the label metadata
        actual: u64,
    },

    /// UTF-16 blocks are made of whole code units
    #[error("value block {index} has an odd length of {length} bytes")]
    OddValueLength {
        /// Position of the value in the flattened string order
        index: usize,
        /// Length of the block in bytes
        length: u32,
    },
}

/// Counts that are stored in the header
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    /// Number of labels
    #[display("label count")]
    Labels,

    /// Number of strings across all labels
    #[display("string count")]
    Strings,
}

/// Error type for a [`crate::types::BtxtFile`] that can't be written as-is
#[derive(Error, Diagnostic, Debug)]
pub enum ConsistencyError {
    /// declared count differs from the structure
    #[error("{field} is declared as {declared} but the file holds {actual}")]
    CountMismatch {
        /// Which count disagrees
        field: CountField,
        /// The declared value
        declared: u32,
        /// The value derived from the labels
        actual: u64,
    },

    /// count does not fit in the 16 bit header field
    #[error("{field} of {value} does not fit in the 16 bit header field")]
    CountOverflow {
        /// Which count overflows
        field: CountField,
        /// The count
        value: u64,
    },

    /// identifiers must run 0, 1, 2... within a label
    #[error("label {label:?} has identifier {found} at position {position}, expected {position}")]
    #[diagnostic(help("pass --allow-sparse-ids to write identifiers as they are"))]
    IdentifierSequence {
        /// Key of the label
        label: String,
        /// Position of the string inside the label
        position: usize,
        /// The identifier found there
        found: u32,
    },

    /// the data region grew past what 32 bit offsets can address
    #[error("block {index} would end past the 32 bit offset range")]
    OffsetOverflow {
        /// Position of the block in the layout (keys first, then values)
        index: usize,
    },
}

/// Error type for text that can't be carried by its block's charset
#[derive(Error, Diagnostic, Debug)]
pub enum EncodingError {
    /// label keys are single byte ascii
    #[error("label {index} key has non-ascii character {character:?} at position {position}")]
    NonAsciiKey {
        /// Position of the label
        index: usize,
        /// Character position inside the key
        position: usize,
        /// The offending character
        character: char,
    },

    /// label key bytes are single byte ascii
    #[error("label {index} key has non-ascii byte {byte:#04x} at position {position}")]
    NonAsciiKeyByte {
        /// Position of the label
        index: usize,
        /// Byte position inside the key
        position: usize,
        /// The offending byte
        byte: u8,
    },

    /// trailing NUL characters can't be told apart from padding
    #[error("{context} {index} ends with a NUL character, which would be read back as padding")]
    TrailingNul {
        /// Whether a label key or a string value
        context: &'static str,
        /// Position of the label, or of the value in the flattened string order
        index: usize,
    },

    /// value is not valid utf-16
    #[error("value {index} is not valid UTF-16")]
    InvalidUtf16 {
        /// Position of the value in the flattened string order
        index: usize,
        /// The decoding failure
        #[source]
        source: std::string::FromUtf16Error,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
