//! Content pipeline for a small markdown blog: frontmatter parsing, excerpts,
//! the post catalog, and the pages built from them.

pub mod catalog;
pub mod content;
pub mod date;
pub mod error;
pub mod excerpt;
pub mod frontmatter;
pub mod listing;
pub mod pageview;
pub mod post;
pub mod preview;

pub use error::{Error, Result};
pub use excerpt::derive_excerpt;
pub use frontmatter::{parse_frontmatter, Frontmatter, Metadata};
