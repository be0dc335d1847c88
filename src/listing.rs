use crate::catalog::{Catalog, Environment, PostEntry, PostStatus};
use crate::content::{self, Folder};
use crate::excerpt::derive_excerpt;
use crate::frontmatter::parse_frontmatter;
use serde::Serialize;
use std::path::Path;

pub const DRAFT_LABEL: &str = "Draft";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub slug: String,
    pub title: String,
    pub date_label: String,
    pub excerpt: String,
}

/// Blog index rows for `env`, in display order.
pub fn build_listing(catalog: &Catalog, root: &Path, env: Environment) -> Vec<ListingEntry> {
    catalog
        .visible(env)
        .into_iter()
        .map(|post| ListingEntry {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date_label: date_label(&post.status),
            excerpt: load_excerpt(post, root, env).unwrap_or_else(|| post.description.clone()),
        })
        .collect()
}

fn date_label(status: &PostStatus) -> String {
    match status {
        PostStatus::Published { date } => date.long_label(),
        PostStatus::Draft => DRAFT_LABEL.to_string(),
    }
}

fn load_excerpt(post: &PostEntry, root: &Path, env: Environment) -> Option<String> {
    let folder = post.status.folder();
    if folder == Folder::Drafts && !env.shows_drafts() {
        return None;
    }

    let path = match content::document_path(root, folder, &post.slug) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(slug = %post.slug, error = %e, "falling back to description");
            return None;
        }
    };
    let raw = match content::read_document(&path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "document missing");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "falling back to description");
            return None;
        }
    };

    let excerpt = derive_excerpt(&parse_frontmatter(&raw).body, 1);
    (!excerpt.is_empty()).then_some(excerpt)
}

pub fn format_listing(entries: &[ListingEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| format!("{}\t{}\t{}\t{}", e.slug, e.date_label, e.title, e.excerpt))
        .collect()
}
