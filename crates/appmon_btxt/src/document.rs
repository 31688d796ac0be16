//! Editable document form of a [`BtxtFile`].
//!
//! The document is pretty printed JSON using the field names `NumberOfLabels`, `NumberOfStrings`,
//! `Labels`, `Key`, `Values`, `Id` and `Value`. Label and string order is kept as-is.

use std::io::{Read, Write};

use tracing::instrument;

use crate::error::Result;
use crate::types::BtxtFile;

/// Write `file` as a document.
#[instrument(skip_all, err)]
pub fn to_writer<W: Write>(file: &BtxtFile, mut writer: W) -> Result<W> {
    serde_json::to_writer_pretty(&mut writer, file)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(writer)
}

/// Read a document back into a [`BtxtFile`].
#[instrument(skip_all, err)]
pub fn from_reader<R: Read>(reader: R) -> Result<BtxtFile> {
    Ok(serde_json::from_reader(reader)?)
}
