//! Dotted path codec and the [`LabelPath`] value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::label::{Label, LabelError, decode_label, encode_label};

/// Separator between path segments, in both display and encoded form.
pub const PATH_SEPARATOR: char = '.';

/// Encode every segment of a dotted display path.
pub fn encode_path(path: &str) -> String {
    path.split(PATH_SEPARATOR)
        .map(encode_label)
        .collect::<Vec<_>>()
        .join(".")
}

/// Decode every segment of an encoded dotted path.
pub fn decode_path(path: &str) -> Result<String, LabelError> {
    let labels = path
        .split(PATH_SEPARATOR)
        .map(decode_label)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(labels.join("."))
}

/// A materialized ancestor path: a non-empty sequence of encoded labels.
///
/// Items store the path of their parent (`parent_path`) or, while archived,
/// the path they were archived from (`restore_path`). All structural edits
/// needed by rename and move cascades live here so that callers never
/// splice raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelPath {
    labels: Vec<Label>,
}

impl LabelPath {
    /// A path consisting of a single label.
    pub fn single(label: Label) -> Self {
        Self {
            labels: vec![label],
        }
    }

    /// Build a path from a dotted display path such as `admin.folder1`.
    pub fn from_display(path: &str) -> Result<Self, LabelError> {
        if path.split(PATH_SEPARATOR).any(str::is_empty) {
            return Err(LabelError::EmptySegment {
                path: path.to_string(),
            });
        }
        Ok(Self {
            labels: path.split(PATH_SEPARATOR).map(Label::encode).collect(),
        })
    }

    /// Parse an already-encoded dotted path as stored in the database.
    pub fn parse(encoded: &str) -> Result<Self, LabelError> {
        let labels = encoded
            .split(PATH_SEPARATOR)
            .map(Label::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { labels })
    }

    /// Decode back to the dotted display path.
    pub fn to_display(&self) -> Result<String, LabelError> {
        let parts = self
            .labels
            .iter()
            .map(Label::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("."))
    }

    /// The encoded labels, root first.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of labels in the path.
    pub fn depth(&self) -> usize {
        self.labels.len()
    }

    /// The last label.
    pub fn last(&self) -> &Label {
        // Non-empty by construction.
        &self.labels[self.labels.len() - 1]
    }

    /// All but the last label, or `None` for a single-label path.
    pub fn parent(&self) -> Option<Self> {
        if self.labels.len() < 2 {
            return None;
        }
        Some(Self {
            labels: self.labels[..self.labels.len() - 1].to_vec(),
        })
    }

    /// This path extended by one label.
    pub fn child(&self, label: &Label) -> Self {
        let mut labels = self.labels.clone();
        labels.push(label.clone());
        Self { labels }
    }

    /// Returns `true` if `prefix` equals this path or is one of its ancestors.
    pub fn starts_with(&self, prefix: &LabelPath) -> bool {
        self.labels.starts_with(&prefix.labels)
    }

    /// Replace the label at `index`, leaving every other segment untouched.
    pub fn replace_segment(&self, index: usize, label: &Label) -> Option<Self> {
        if index >= self.labels.len() {
            return None;
        }
        let mut labels = self.labels.clone();
        labels[index] = label.clone();
        Some(Self { labels })
    }

    /// Swap the leading `old` prefix for `new`, keeping the remaining suffix.
    ///
    /// Returns `None` when this path does not start with `old`.
    pub fn replace_prefix(&self, old: &LabelPath, new: &LabelPath) -> Option<Self> {
        if !self.starts_with(old) {
            return None;
        }
        let mut labels = new.labels.clone();
        labels.extend_from_slice(&self.labels[old.labels.len()..]);
        Some(Self { labels })
    }

    /// lquery pattern matching this path and everything beneath it.
    pub fn subtree_pattern(&self) -> String {
        format!("{self}.*")
    }
}

impl fmt::Display for LabelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(label.as_str())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for LabelPath {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LabelPath> for String {
    fn from(path: LabelPath) -> Self {
        path.to_string()
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for LabelPath {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for LabelPath {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        let encoded = self.to_string();
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&encoded, buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for LabelPath {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <String as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&raw)?)
    }
}
