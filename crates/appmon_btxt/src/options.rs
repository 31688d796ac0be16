//! Conversion settings shared by the reader and the writer

use bon::Builder;

/// Options controlling how BTXT files are decoded and encoded
///
/// ```
/// use appmon_btxt::BtxtOptions;
///
/// let options = BtxtOptions::builder().escape_newlines(true).build();
/// assert!(options.escape_newlines);
/// assert!(options.check_identifiers);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct BtxtOptions {
    /// Legacy newline normalization.
    ///
    /// When reading, the two character sequences `\r` and `\n` stored in values become carriage
    /// return and line feed characters. When writing, carriage returns and line feeds are stored
    /// as those two character sequences.
    #[builder(default)]
    pub escape_newlines: bool,

    /// Reject files whose string identifiers do not run `0..count` inside every label when writing.
    #[builder(default = true)]
    pub check_identifiers: bool,
}

impl Default for BtxtOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Replace carriage returns and line feeds with their two character escape sequences.
pub(crate) fn escape_newlines(value: &str) -> String {
    value.replace('\r', "\\r").replace('\n', "\\n")
}

/// Replace the two character escape sequences `\r` and `\n` with the control characters.
pub(crate) fn unescape_newlines(value: &str) -> String {
    value.replace("\\r", "\r").replace("\\n", "\n")
}
