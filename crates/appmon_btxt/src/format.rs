//! Fixed size records of a BTXT file.

use binrw::{BinRead, BinWrite};

/// Signature every BTXT file starts with
pub const MAGIC: [u8; 8] = [0x00, 0x00, 0x00, 0x00, 0x24, 0x10, 0x12, 0xFF];

/// BTXT file header
///
/// The signature followed by the number of labels and strings. All data is stored in little
/// endian format.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"\x00\x00\x00\x00\x24\x10\x12\xFF", little)]
pub struct BtxtHeader {
    /// The number of labels stored in the file
    pub label_count: u16,

    /// The number of strings stored across all labels
    pub string_count: u16,
}

impl BtxtHeader {
    /// Size of the header in bytes
    pub const SIZE: u64 = 12;
}

/// Location of one text block inside the data region
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct OffsetPair {
    /// Offset of the first byte of the block
    pub start: u32,

    /// Offset just past the last byte of the block
    pub end: u32,
}

impl OffsetPair {
    /// Size of an offset table entry in bytes
    pub const SIZE: u64 = 8;
}
