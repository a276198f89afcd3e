pub mod field_path;
pub mod issues;
pub mod prune;

pub use field_path::{FieldPath, FieldPathSegment};
pub use issues::{IssueSeverity, StructuredIssue};
pub use prune::{is_empty_value, prune_empty, prune_empty_map};
