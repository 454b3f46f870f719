//! Label-tree (ltree) encoding for item names and hierarchical paths.
//!
//! Item names are arbitrary display strings, but a label-tree path only
//! admits a restricted alphabet per segment and reserves `.` as the segment
//! separator. Every name is therefore stored as an unpadded base32 label,
//! and a path is the dot-joined sequence of such labels.

pub mod label;
pub mod path;

pub use label::{Label, LabelError, decode_label, encode_label};
pub use path::{LabelPath, PATH_SEPARATOR, decode_path, encode_path};
