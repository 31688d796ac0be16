use appmon_btxt::error::{Error, FormatError};
use appmon_btxt::read::decode_bytes;
use appmon_btxt::write::encode_to_vec;
use appmon_btxt::{BtxtFile, BtxtLabel, BtxtOptions, BtxtString};
use proptest::prelude::*;

fn label() -> impl Strategy<Value = BtxtLabel> {
    (
        "[ -~]{0,12}",
        // Values never hold NUL since trailing zero units are padding
        prop::collection::vec("[^\\x00]{0,16}", 0..5),
    )
        .prop_map(|(key, values)| {
            let values = values
                .into_iter()
                .enumerate()
                .map(|(id, value)| BtxtString::new(id as u32, value))
                .collect();
            BtxtLabel::new(key, values)
        })
}

fn btxt_file() -> impl Strategy<Value = BtxtFile> {
    prop::collection::vec(label(), 0..6).prop_map(BtxtFile::from_labels)
}

fn block_ends(data: &[u8]) -> Vec<(usize, usize)> {
    let labels = u16::from_le_bytes([data[8], data[9]]) as usize;
    let strings = u16::from_le_bytes([data[10], data[11]]) as usize;

    let mut position = 12;
    for _ in 0..labels {
        let count = u32::from_le_bytes(data[position..position + 4].try_into().unwrap()) as usize;
        position += 4 + 4 * count;
    }

    let table = position;
    let data_start = table + 8 * (labels + strings);
    (0..labels + strings)
        .map(|entry| {
            let at = table + 8 * entry;
            let start = u32::from_le_bytes(data[at..at + 4].try_into().unwrap()) as usize;
            let end = u32::from_le_bytes(data[at + 4..at + 8].try_into().unwrap()) as usize;
            (data_start + start, data_start + end)
        })
        .collect()
}

proptest! {
    #[test]
    fn decode_inverts_encode(file in btxt_file()) {
        let data = encode_to_vec(&file, &BtxtOptions::default()).unwrap();
        let decoded = decode_bytes(&data, &BtxtOptions::default()).unwrap();
        prop_assert_eq!(decoded, file);
    }

    #[test]
    fn escaped_decode_inverts_escaped_encode(file in btxt_file()) {
        // Literal escape sequences in the input would be unescaped on the way back
        prop_assume!(file.strings().all(|s| !s.value.contains('\\')));

        let options = BtxtOptions::builder().escape_newlines(true).build();
        let data = encode_to_vec(&file, &options).unwrap();
        prop_assert_eq!(decode_bytes(&data, &options).unwrap(), file);
    }

    #[test]
    fn blocks_end_even_with_terminator(file in btxt_file()) {
        let data = encode_to_vec(&file, &BtxtOptions::default()).unwrap();
        let ends = block_ends(&data);
        let keys = file.labels.len();

        for (index, (start, end)) in ends.into_iter().enumerate() {
            prop_assert_eq!(end % 2, 0);
            let unit = if index < keys { 1 } else { 2 };
            prop_assert!(end - start >= unit);
            prop_assert!(data[end - unit..end].iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn wrong_magic_is_rejected(file in btxt_file(), position in 0usize..8, flip in 1u8..=255) {
        let mut data = encode_to_vec(&file, &BtxtOptions::default()).unwrap();
        data[position] ^= flip;

        let result = decode_bytes(&data, &BtxtOptions::default());
        let bad_magic = matches!(result, Err(Error::Format(FormatError::BadMagic { .. })));
        prop_assert!(bad_magic);
    }
}

#[test]
fn every_truncation_is_reported() {
    let file = BtxtFile::from_labels(vec![
        BtxtLabel::new(
            "MenuItems".into(),
            vec![BtxtString::new(0, "Start".into()), BtxtString::new(1, "Quit".into())],
        ),
        BtxtLabel::new("Odd".into(), vec![BtxtString::new(0, "x".into())]),
    ]);
    let data = encode_to_vec(&file, &BtxtOptions::default()).unwrap();

    for length in 0..data.len() {
        match decode_bytes(&data[..length], &BtxtOptions::default()) {
            Err(Error::TruncatedData { .. }) => {}
            other => panic!("cut at {length} gave {other:?}"),
        }
    }
}
