//! File-backed content store
//!
//! - Documents are `*.md` files (optional `+++` TOML front matter) or `*.json` objects
//! - `ContentStore::query()` filters, sorts and pages them on every call, no index

pub mod document;
pub mod index;
pub mod store;

pub use document::{parse_document, ContentKind, Document, ParseDocumentError};
pub use index::{ContentQuery, Direction, FindContentError};
pub use store::{ContentStore, LoadDocumentsError};
