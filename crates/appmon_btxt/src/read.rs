//! Types for reading BTXT files
//!

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use tracing::{debug, instrument, trace};

use crate::error::{EncodingError, Error, FormatError, Result};
use crate::format::{BtxtHeader, OffsetPair};
use crate::options::{unescape_newlines, BtxtOptions};
use crate::types::{BtxtFile, BtxtLabel, BtxtString};

/// Read a BTXT file from `reader`.
///
/// The reader is left positioned somewhere inside the data region. Either the whole file is
/// returned or an error, never a partially filled [`BtxtFile`].
///
/// ```no_run
/// use std::fs::File;
/// use appmon_btxt::{read::decode, BtxtOptions};
///
/// fn list_labels(path: &str) -> appmon_btxt::error::Result<()> {
///     let btxt = decode(File::open(path)?, &BtxtOptions::default())?;
///
///     for label in &btxt.labels {
///         println!("{}: {} strings", label.key, label.len());
///     }
///
///     Ok(())
/// }
/// ```
#[instrument(skip_all, err)]
pub fn decode<R: Read + Seek>(reader: R, options: &BtxtOptions) -> Result<BtxtFile> {
    BtxtReader { reader }.read(options)
}

/// Read a BTXT file held in memory.
pub fn decode_bytes(data: &[u8], options: &BtxtOptions) -> Result<BtxtFile> {
    decode(Cursor::new(data), options)
}

struct BtxtReader<R> {
    reader: R,
}

impl<R: Read + Seek> BtxtReader<R> {
    fn read(mut self, options: &BtxtOptions) -> Result<BtxtFile> {
        let header = self.read_header()?;
        debug!(
            labels = header.label_count,
            strings = header.string_count,
            "read header"
        );

        let ids = self.read_label_metadata(&header)?;
        let pairs = self.read_offset_table(&header)?;
        let data_start = self.reader.stream_position()?;
        trace!(data_start, "read offset table");

        let (key_pairs, value_pairs) = pairs.split_at(ids.len());

        let mut keys = Vec::with_capacity(key_pairs.len());
        for (index, pair) in key_pairs.iter().enumerate() {
            let mut bytes = self.read_block(data_start, pair, "label key")?;
            strip_trailing_zeros(&mut bytes);
            keys.push(decode_key(index, &bytes)?);
        }

        let mut values = Vec::with_capacity(value_pairs.len());
        for (index, pair) in value_pairs.iter().enumerate() {
            let bytes = self.read_block(data_start, pair, "string value")?;
            if bytes.len() % 2 != 0 {
                return Err(FormatError::OddValueLength {
                    index,
                    length: pair.end - pair.start,
                }
                .into());
            }

            let mut units = vec![0u16; bytes.len() / 2];
            LittleEndian::read_u16_into(&bytes, &mut units);
            strip_trailing_zeros(&mut units);

            let value = String::from_utf16(&units)
                .map_err(|source| EncodingError::InvalidUtf16 { index, source })?;
            values.push(if options.escape_newlines {
                unescape_newlines(&value)
            } else {
                value
            });
        }

        let mut values = values.into_iter();
        let labels = ids
            .into_iter()
            .zip(keys)
            .map(|(label_ids, key)| {
                let strings = label_ids
                    .into_iter()
                    .zip(values.by_ref())
                    .map(|(id, value)| BtxtString::new(id, value))
                    .collect();
                BtxtLabel::new(key, strings)
            })
            .collect();

        Ok(BtxtFile::new(
            u32::from(header.label_count),
            u32::from(header.string_count),
            labels,
        ))
    }

    fn read_header(&mut self) -> Result<BtxtHeader> {
        let offset = self.reader.stream_position()?;
        match BtxtHeader::read(&mut self.reader) {
            Ok(header) => Ok(header),
            Err(err) if is_bad_magic(&err) => {
                let mut found = [0u8; 8];
                self.reader.seek(SeekFrom::Start(offset))?;
                self.reader.read_exact(&mut found)?;
                Err(FormatError::BadMagic { found }.into())
            }
            Err(err) if err.is_eof() => Err(Error::TruncatedData {
                offset,
                context: "header",
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Identifiers of every label's strings, label by label.
    fn read_label_metadata(&mut self, header: &BtxtHeader) -> Result<Vec<Vec<u32>>> {
        let declared = header.string_count;
        let mut total = 0u64;

        let mut labels = Vec::with_capacity(header.label_count as usize);
        for _ in 0..header.label_count {
            let count = self.read_u32("label string count")?;
            total += u64::from(count);
            if total > u64::from(declared) {
                return Err(FormatError::StringCountMismatch {
                    declared,
                    actual: total,
                }
                .into());
            }

            let mut ids = Vec::with_capacity(count as usize);
            for _ in 0..count {
                ids.push(self.read_u32("string identifier")?);
            }
            labels.push(ids);
        }

        if total != u64::from(declared) {
            return Err(FormatError::StringCountMismatch {
                declared,
                actual: total,
            }
            .into());
        }

        Ok(labels)
    }

    fn read_offset_table(&mut self, header: &BtxtHeader) -> Result<Vec<OffsetPair>> {
        let entries = header.label_count as usize + header.string_count as usize;

        let mut pairs = Vec::with_capacity(entries);
        for index in 0..entries {
            let offset = self.reader.stream_position()?;
            let pair = OffsetPair::read(&mut self.reader).map_err(|err| {
                if err.is_eof() {
                    Error::TruncatedData {
                        offset,
                        context: "offset table",
                    }
                } else {
                    err.into()
                }
            })?;

            if pair.end < pair.start {
                return Err(FormatError::InvalidOffsetRange {
                    index,
                    start: pair.start,
                    end: pair.end,
                }
                .into());
            }

            pairs.push(pair);
        }

        Ok(pairs)
    }

    fn read_block(
        &mut self,
        data_start: u64,
        pair: &OffsetPair,
        context: &'static str,
    ) -> Result<Vec<u8>> {
        let offset = data_start + u64::from(pair.start);
        let length = u64::from(pair.end - pair.start);

        self.reader.seek(SeekFrom::Start(offset))?;

        let mut buffer = Vec::new();
        self.reader.by_ref().take(length).read_to_end(&mut buffer)?;
        if (buffer.len() as u64) < length {
            return Err(Error::TruncatedData { offset, context });
        }

        Ok(buffer)
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        let offset = self.reader.stream_position()?;
        self.reader
            .read_u32::<LittleEndian>()
            .map_err(|err| match err.kind() {
                io::ErrorKind::UnexpectedEof => Error::TruncatedData { offset, context },
                _ => err.into(),
            })
    }
}

fn is_bad_magic(err: &binrw::Error) -> bool {
    match err {
        binrw::Error::BadMagic { .. } => true,
        binrw::Error::Backtrace(backtrace) => is_bad_magic(&backtrace.error),
        _ => false,
    }
}

fn strip_trailing_zeros<T: Default + PartialEq>(data: &mut Vec<T>) {
    let zero = T::default();
    while data.last() == Some(&zero) {
        data.pop();
    }
}

fn decode_key(index: usize, bytes: &[u8]) -> Result<String> {
    if let Some((position, &byte)) = bytes.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
        return Err(EncodingError::NonAsciiKeyByte {
            index,
            position,
            byte,
        }
        .into());
    }

    Ok(bytes.iter().map(|&b| char::from(b)).collect())
}
