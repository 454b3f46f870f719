//! Single-segment label codec.

use std::fmt;

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding labels or building paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The input is not something [`encode_label`] could have produced.
    #[error("malformed label '{label}': {reason}")]
    Malformed {
        /// The offending encoded label.
        label: String,
        /// Why decoding failed.
        reason: String,
    },
    /// A path contained an empty segment (e.g. `a..b`).
    #[error("path '{path}' contains an empty segment")]
    EmptySegment {
        /// The offending path.
        path: String,
    },
}

impl LabelError {
    fn malformed(label: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

/// Encode a display name into a label-tree-safe segment.
///
/// The output only contains `A-Z` and `2-7`. Base32 padding is dropped
/// since the padding length is implied by the encoded length.
pub fn encode_label(raw: &str) -> String {
    BASE32_NOPAD.encode(raw.as_bytes())
}

/// Decode a label produced by [`encode_label`].
pub fn decode_label(encoded: &str) -> Result<String, LabelError> {
    let bytes = BASE32_NOPAD
        .decode(encoded.as_bytes())
        .map_err(|e| LabelError::malformed(encoded, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LabelError::malformed(encoded, e.to_string()))
}

/// An encoded path segment.
///
/// A `Label` always holds the encoded form; use [`Label::decode`] to get the
/// display name back. Labels read back from storage are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Encode a display name.
    pub fn encode(display: &str) -> Self {
        Self(encode_label(display))
    }

    /// Validate an already-encoded label.
    pub fn parse(encoded: &str) -> Result<Self, LabelError> {
        if encoded.is_empty() {
            return Err(LabelError::malformed(encoded, "empty label"));
        }
        decode_label(encoded)?;
        Ok(Self(encoded.to_string()))
    }

    /// Decode back to the display name.
    pub fn decode(&self) -> Result<String, LabelError> {
        decode_label(&self.0)
    }

    /// The encoded form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for Label {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Label {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Label {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <String as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&raw)?)
    }
}
