//! Logical content of a BTXT file, independent of its byte layout.

use derive_more::derive::Constructor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConsistencyError, CountField, Result};
use crate::options::BtxtOptions;

/// A single string entry
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct BtxtString {
    /// Identifier of the string within its label
    pub id: u32,

    /// Text of the string
    pub value: String,
}

/// A named group of strings
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct BtxtLabel {
    /// Name of the label, stored as ascii
    pub key: String,

    /// Strings of this label in table order
    pub values: Vec<BtxtString>,
}

impl BtxtLabel {
    /// Number of strings in this label
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this label has no strings
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A whole BTXT file
///
/// The declared counts are kept as read so that a file can be inspected even when they disagree
/// with the labels. [`BtxtFile::validate`] checks them before writing.
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BtxtFile {
    /// Declared number of labels
    #[cfg_attr(feature = "serde", serde(rename = "NumberOfLabels"))]
    pub label_count: u32,

    /// Declared number of strings across all labels
    #[cfg_attr(feature = "serde", serde(rename = "NumberOfStrings"))]
    pub string_count: u32,

    /// Labels in table order
    #[cfg_attr(feature = "serde", serde(rename = "Labels"))]
    pub labels: Vec<BtxtLabel>,
}

impl BtxtFile {
    /// Build a file whose declared counts match the given labels.
    pub fn from_labels(labels: Vec<BtxtLabel>) -> Self {
        let strings = labels.iter().map(BtxtLabel::len).sum::<usize>();
        Self {
            label_count: labels.len() as u32,
            string_count: strings as u32,
            labels,
        }
    }

    /// Iterate over every string in table order, label by label.
    pub fn strings(&self) -> impl Iterator<Item = &BtxtString> {
        self.labels.iter().flat_map(|label| label.values.iter())
    }

    /// Check that the file can be written without losing or corrupting data.
    pub fn validate(&self, options: &BtxtOptions) -> Result<()> {
        let labels = self.labels.len() as u64;
        let strings = self.labels.iter().map(|l| l.len() as u64).sum::<u64>();

        if u64::from(self.label_count) != labels {
            return Err(ConsistencyError::CountMismatch {
                field: CountField::Labels,
                declared: self.label_count,
                actual: labels,
            }
            .into());
        }

        if u64::from(self.string_count) != strings {
            return Err(ConsistencyError::CountMismatch {
                field: CountField::Strings,
                declared: self.string_count,
                actual: strings,
            }
            .into());
        }

        for (field, value) in [(CountField::Labels, labels), (CountField::Strings, strings)] {
            if value > u64::from(u16::MAX) {
                return Err(ConsistencyError::CountOverflow { field, value }.into());
            }
        }

        if options.check_identifiers {
            for label in &self.labels {
                if let Some((position, value)) = label
                    .values
                    .iter()
                    .enumerate()
                    .find(|(position, value)| value.id as usize != *position)
                {
                    return Err(ConsistencyError::IdentifierSequence {
                        label: label.key.clone(),
                        position,
                        found: value.id,
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}
