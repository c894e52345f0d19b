//! On-disk content: frontmatter documents, article discovery and content checks.

pub mod error;
pub mod frontmatter;
pub mod scanner;
pub mod validate;

pub use error::{ContentError, Result};
pub use frontmatter::{Document, FrontmatterError};
pub use scanner::{
    ArticleRecord, StorageShape, content_files, content_id, content_ids, scan_collection,
};
pub use validate::{ValidationReport, validate_content};
