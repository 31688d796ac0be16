//! Types for writing BTXT files
//!

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Write};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::format::{BtxtHeader, OffsetPair};
use crate::layout::BtxtLayout;
use crate::options::BtxtOptions;
use crate::types::BtxtFile;

/// Write `file` to `writer` as a BTXT file.
///
/// The file is validated and laid out before anything reaches the writer, so a failure never
/// leaves a partial file behind. The writer is returned once everything has been written.
///
/// ```
/// # fn doit() -> appmon_btxt::error::Result<()>
/// # {
/// use appmon_btxt::{write::encode, BtxtFile, BtxtLabel, BtxtOptions, BtxtString};
///
/// let file = BtxtFile::from_labels(vec![BtxtLabel::new(
///     "Greeting".into(),
///     vec![BtxtString::new(0, "Hi".into())],
/// )]);
///
/// // We use a buffer here, though you'd normally use a `File`
/// let buffer = encode(&file, Vec::new(), &BtxtOptions::default())?;
/// assert_eq!(buffer.len(), 52);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[instrument(skip_all, err)]
pub fn encode<W: Write>(file: &BtxtFile, mut writer: W, options: &BtxtOptions) -> Result<W> {
    let data = encode_to_vec(file, options)?;
    writer.write_all(&data)?;
    writer.flush()?;

    Ok(writer)
}

/// Encode `file` into a new buffer.
pub fn encode_to_vec(file: &BtxtFile, options: &BtxtOptions) -> Result<Vec<u8>> {
    file.validate(options)?;
    let layout = BtxtLayout::compute(file, options)?;

    let ids = u64::from(file.string_count);
    let entries = u64::from(file.label_count) + ids;
    let size = BtxtHeader::SIZE
        + 4 * u64::from(file.label_count)
        + 4 * ids
        + OffsetPair::SIZE * entries
        + u64::from(layout.data_len());

    let mut out = Cursor::new(Vec::with_capacity(size as usize));

    // Counts were checked against the 16 bit range by validate
    BtxtHeader {
        label_count: file.label_count as u16,
        string_count: file.string_count as u16,
    }
    .write(&mut out)?;

    for label in &file.labels {
        out.write_u32::<LittleEndian>(label.len() as u32)?;
        for string in &label.values {
            out.write_u32::<LittleEndian>(string.id)?;
        }
    }

    for block in layout.blocks() {
        OffsetPair {
            start: block.start,
            end: block.end,
        }
        .write(&mut out)?;
    }

    for block in layout.blocks() {
        out.write_all(&block.bytes)?;
        out.write_all(&vec![0u8; block.padding()])?;
    }

    debug!(
        labels = file.label_count,
        strings = file.string_count,
        bytes = out.get_ref().len(),
        "encoded btxt"
    );

    Ok(out.into_inner())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::encode_to_vec;
    use crate::error::{ConsistencyError, EncodingError, Error, Result};
    use crate::options::BtxtOptions;
    use crate::types::{BtxtFile, BtxtLabel, BtxtString};

    #[traced_test]
    #[test]
    fn write_greeting() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x00, 0x24, 0x10, 0x12, 0xFF, // Magic
            0x01, 0x00,                                     // Labels
            0x01, 0x00,                                     // Strings
            0x01, 0x00, 0x00, 0x00,                         // Strings in label
            0x00, 0x00, 0x00, 0x00,                         // Id
            0x00, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, // Key offsets
            0x0A, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, // Value offsets
            b'G', b'r', b'e', b'e', b't', b'i', b'n', b'g', 0x00, 0x00,
            b'H', 0x00, b'i', 0x00, 0x00, 0x00,
        ];

        let file = BtxtFile::from_labels(vec![BtxtLabel::new(
            "Greeting".into(),
            vec![BtxtString::new(0, "Hi".into())],
        )]);

        assert_eq!(encode_to_vec(&file, &BtxtOptions::default())?, expected);

        Ok(())
    }

    #[test]
    fn write_empty() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x00, 0x24, 0x10, 0x12, 0xFF,
            0x00, 0x00,
            0x00, 0x00,
        ];

        assert_eq!(
            encode_to_vec(&BtxtFile::default(), &BtxtOptions::default())?,
            expected
        );

        Ok(())
    }

    #[test]
    fn write_is_deterministic() -> Result<()> {
        let file = BtxtFile::from_labels(vec![
            BtxtLabel::new(
                "Menu".into(),
                vec![
                    BtxtString::new(0, "Start".into()),
                    BtxtString::new(1, "Options".into()),
                ],
            ),
            BtxtLabel::new("Odd".into(), vec![BtxtString::new(0, "x".into())]),
        ]);

        let options = BtxtOptions::default();
        assert_eq!(encode_to_vec(&file, &options)?, encode_to_vec(&file, &options)?);

        Ok(())
    }

    #[test]
    fn escape_does_not_touch_input() -> Result<()> {
        let file = BtxtFile::from_labels(vec![BtxtLabel::new(
            "Lines".into(),
            vec![BtxtString::new(0, "one\r\ntwo".into())],
        )]);
        let before = file.clone();

        let options = BtxtOptions::builder().escape_newlines(true).build();
        let data = encode_to_vec(&file, &options)?;

        assert_eq!(file, before);

        // "one\\r\\ntwo" is ten code units followed by one terminator unit
        let value: Vec<u8> = "one\\r\\ntwo"
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .chain([0, 0])
            .collect();
        assert!(data.ends_with(&value));

        Ok(())
    }

    #[test]
    fn count_mismatch_fails_before_writing() {
        let mut file = BtxtFile::from_labels(vec![BtxtLabel::new("A".into(), vec![])]);
        file.label_count = 4;

        let mut out = Vec::new();
        let err = super::encode(&file, &mut out, &BtxtOptions::default()).unwrap_err();

        assert!(matches!(err, Error::Consistency(ConsistencyError::CountMismatch { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn non_ascii_key_fails() {
        let file = BtxtFile::from_labels(vec![BtxtLabel::new("Ключ".into(), vec![])]);

        assert!(matches!(
            encode_to_vec(&file, &BtxtOptions::default()),
            Err(Error::Encoding(EncodingError::NonAsciiKey { position: 0, .. }))
        ));
    }

    #[test]
    fn sparse_ids_when_allowed() -> Result<()> {
        let file = BtxtFile::from_labels(vec![BtxtLabel::new(
            "Sparse".into(),
            vec![BtxtString::new(7, "a".into()), BtxtString::new(3, "b".into())],
        )]);

        assert!(matches!(
            encode_to_vec(&file, &BtxtOptions::default()),
            Err(Error::Consistency(ConsistencyError::IdentifierSequence { .. }))
        ));

        let options = BtxtOptions::builder().check_identifiers(false).build();
        let data = encode_to_vec(&file, &options)?;
        assert_eq!(&data[16..20], &7u32.to_le_bytes());
        assert_eq!(&data[20..24], &3u32.to_le_bytes());

        Ok(())
    }

    #[test]
    fn trailing_nul_fails_before_writing() {
        let file = BtxtFile::from_labels(vec![BtxtLabel::new(
            "Key".into(),
            vec![BtxtString::new(0, "Appmon\0".into())],
        )]);

        let mut out = Vec::new();
        let err = super::encode(&file, &mut out, &BtxtOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            Error::Encoding(EncodingError::TrailingNul {
                context: "string value",
                index: 0
            })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn inner_nul_round_trips() -> Result<()> {
        let file = BtxtFile::from_labels(vec![BtxtLabel::new(
            "Name".into(),
            vec![BtxtString::new(0, "Appmon\0mon".into())],
        )]);

        let data = encode_to_vec(&file, &BtxtOptions::default())?;
        assert_eq!(crate::read::decode_bytes(&data, &BtxtOptions::default())?, file);

        Ok(())
    }
}
