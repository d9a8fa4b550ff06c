//! String cell payload decoding.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decoder::Utf8Policy;

/// Concatenated null-terminated strings of one batch.
///
/// The wire layer hands over text when the payload already validated as
/// UTF-8 and raw bytes otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringCells {
    /// Payload known to be valid UTF-8.
    Text(String),
    /// Undecoded payload.
    Bytes(Vec<u8>),
}

impl Default for StringCells {
    fn default() -> Self {
        StringCells::Bytes(Vec::new())
    }
}

impl StringCells {
    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            StringCells::Text(s) => s.len(),
            StringCells::Bytes(b) => b.len(),
        }
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the payload as text, never failing.
    ///
    /// Invalid UTF-8 is handled according to `policy`.
    #[must_use]
    pub fn decode(&self, policy: Utf8Policy) -> Cow<'_, str> {
        let bytes = match self {
            StringCells::Text(s) => return Cow::Borrowed(s.as_str()),
            StringCells::Bytes(b) => b.as_slice(),
        };

        match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(e) => {
                debug!(
                    valid_up_to = e.valid_up_to(),
                    len = bytes.len(),
                    ?policy,
                    "string cells are not valid UTF-8, decoding lossily"
                );
                match policy {
                    Utf8Policy::Replace => String::from_utf8_lossy(bytes),
                    Utf8Policy::Ignore => Cow::Owned(decode_ignoring_invalid(bytes)),
                }
            }
        }
    }

    /// Splits the payload into its individual strings.
    ///
    /// Every string is null-terminated, so the split always leaves one empty
    /// trailing piece which is dropped.
    #[must_use]
    pub fn split(&self, policy: Utf8Policy) -> Vec<String> {
        let text = self.decode(policy);
        let mut strings: Vec<String> = text.split('\0').map(str::to_owned).collect();
        strings.pop();
        strings
    }
}

impl From<String> for StringCells {
    fn from(text: String) -> Self {
        StringCells::Text(text)
    }
}

impl From<&str> for StringCells {
    fn from(text: &str) -> Self {
        StringCells::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for StringCells {
    fn from(bytes: Vec<u8>) -> Self {
        StringCells::Bytes(bytes)
    }
}

impl From<&[u8]> for StringCells {
    fn from(bytes: &[u8]) -> Self {
        StringCells::Bytes(bytes.to_vec())
    }
}

/// Drops every invalid UTF-8 sequence, keeping the valid text around it.
fn decode_ignoring_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                // error_len is None only for a truncated sequence at the end
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}
