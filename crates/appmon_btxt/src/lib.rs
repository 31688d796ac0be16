//! This library handles reading from and creating **BTXT** string table files.
//!
//! # BTXT Format Documentation
//!
//! A BTXT file stores localized text grouped under labels. Every label has an ascii key and a
//! list of strings, and every string has a numeric identifier and a UTF-16 value. BTXT files are
//! typically identified with the `.btxt` extension.
//!
//! ## File Structure
//!
//! A BTXT file consists of a header, the label metadata, an offset table, and a data region
//! holding the label keys and string values.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 8 bytes: `00 00 00 00 24 10 12 FF`                         |
//! | 0x0008         | Label Count            | 2 bytes: Number of labels in the file                      |
//! | 0x000A         | String Count           | 2 bytes: Number of strings across all labels               |
//! | 0x000C         | Label Metadata         | Variable: see below                                        |
//!
//! ### Label Metadata
//!
//! For each label, in table order:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Value Count            | 4 bytes: Number of strings in this label                |
//! | 0x0004         | IDs                    | (Value Count * 4) bytes: Identifier of each string      |
//!
//! ### Offset Table
//!
//! One entry for every label followed by one entry for every string, with the strings in label
//! order. Offsets are relative to the start of the data region, which begins right after the
//! table.
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Start                  | 4 bytes: Offset of the first byte of the block          |
//! | 0x0004         | End                    | 4 bytes: Offset just past the end of the block          |
//!
//! ### Data Region
//!
//! The label keys as single byte ascii, then the string values as UTF-16LE. Each block is
//! followed by zero bytes so that it ends on an even offset and holds at least one terminator
//! (one byte for keys, two bytes for values).
//!
//! ## Additional Information
//!
//! - **File Extension**: `.btxt`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod format;
pub mod layout;
pub mod options;
pub mod read;
pub mod types;
pub mod write;

#[cfg(feature = "serde")]
pub mod document;

pub use options::BtxtOptions;
pub use read::decode;
pub use types::{BtxtFile, BtxtLabel, BtxtString};
pub use write::encode;
