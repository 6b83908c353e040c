//! Source content: frontmatter, collected items and the notes tree.

pub mod collect;
pub mod frontmatter;
pub mod item;
pub mod tree;

pub use collect::{BuildReport, Collection, collect};
pub use item::{ContentItem, ContentKind, TagIndex, sort_by_date_desc};
pub use tree::TreeNode;
