//! Byte layout of the data region.
//!
//! Blocks are placed one after another by their position in the table: every label key first,
//! then every string value in label order. Offsets are relative to the start of the data region
//! which follows the offset table directly.

use std::borrow::Cow;

use byteorder::{ByteOrder, LittleEndian};
use tracing::{instrument, trace};
use widestring::U16String;

use crate::error::{ConsistencyError, EncodingError, Result};
use crate::options::{escape_newlines, BtxtOptions};
use crate::types::BtxtFile;

/// Width in bytes of one character of a label key
pub const KEY_UNIT: u64 = 1;

/// Width in bytes of one code unit of a string value
pub const VALUE_UNIT: u64 = 2;

/// Number of zero bytes to append after a block.
///
/// The result always holds at least one whole terminator unit and moves the end of the block to
/// an even offset.
pub fn padding_len(unpadded_end: u64, unit_width: u64) -> u64 {
    if (unpadded_end + unit_width) % 2 == 0 {
        unit_width
    } else {
        unit_width + 1
    }
}

/// One encoded text block and its place in the data region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Offset of the first byte
    pub start: u32,
    /// Offset just past the padding
    pub end: u32,
    /// Encoded text without padding
    pub bytes: Vec<u8>,
}

impl Block {
    /// Number of zero bytes following the text
    pub fn padding(&self) -> usize {
        (self.end - self.start) as usize - self.bytes.len()
    }
}

/// Offsets and encoded contents of every block of a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BtxtLayout {
    /// Label key blocks in label order
    pub keys: Vec<Block>,
    /// String value blocks in flattened string order
    pub values: Vec<Block>,
}

impl BtxtLayout {
    /// Encode every key and value of `file` and assign their offsets.
    ///
    /// The file is only read; newline escaping works on a copy of each value.
    #[instrument(skip_all, err)]
    pub fn compute(file: &BtxtFile, options: &BtxtOptions) -> Result<Self> {
        let mut cursor = 0u64;
        let mut index = 0usize;

        let mut keys = Vec::with_capacity(file.labels.len());
        for (label_index, label) in file.labels.iter().enumerate() {
            let bytes = encode_key(label_index, &label.key)?;
            keys.push(place(&mut cursor, index, bytes, KEY_UNIT)?);
            index += 1;
        }

        let mut values = Vec::with_capacity(file.strings().count());
        for (value_index, string) in file.strings().enumerate() {
            let text = if options.escape_newlines {
                Cow::Owned(escape_newlines(&string.value))
            } else {
                Cow::Borrowed(string.value.as_str())
            };
            let bytes = encode_value(value_index, &text)?;
            values.push(place(&mut cursor, index, bytes, VALUE_UNIT)?);
            index += 1;
        }

        trace!(keys = keys.len(), values = values.len(), data = cursor, "computed layout");

        Ok(BtxtLayout { keys, values })
    }

    /// Iterate over the blocks in the order they appear in the data region
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.keys.iter().chain(self.values.iter())
    }

    /// Size of the data region in bytes
    pub fn data_len(&self) -> u32 {
        self.blocks().last().map_or(0, |block| block.end)
    }
}

fn place(cursor: &mut u64, index: usize, bytes: Vec<u8>, unit: u64) -> Result<Block> {
    let start = *cursor;
    let unpadded = start + bytes.len() as u64;
    let end = unpadded + padding_len(unpadded, unit);

    let (start, end) = match (u32::try_from(start), u32::try_from(end)) {
        (Ok(start), Ok(end)) => (start, end),
        _ => return Err(ConsistencyError::OffsetOverflow { index }.into()),
    };

    *cursor = u64::from(end);
    Ok(Block { start, end, bytes })
}

fn encode_key(index: usize, key: &str) -> Result<Vec<u8>> {
    if let Some((position, character)) = key.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(EncodingError::NonAsciiKey {
            index,
            position,
            character,
        }
        .into());
    }

    if key.ends_with('\0') {
        return Err(EncodingError::TrailingNul {
            context: "label key",
            index,
        }
        .into());
    }

    Ok(key.as_bytes().to_vec())
}

fn encode_value(index: usize, value: &str) -> Result<Vec<u8>> {
    if value.ends_with('\0') {
        return Err(EncodingError::TrailingNul {
            context: "string value",
            index,
        }
        .into());
    }

    let units = U16String::from_str(value).into_vec();
    let mut bytes = vec![0u8; units.len() * 2];
    LittleEndian::write_u16_into(&units, &mut bytes);
    Ok(bytes)
}
