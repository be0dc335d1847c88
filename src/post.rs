use crate::catalog::{Catalog, Environment};
use crate::content;
use crate::error::Result;
use crate::frontmatter::parse_frontmatter;
use serde::Serialize;
use std::path::Path;

pub const UNTITLED: &str = "Untitled";

/// A post ready for the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub title: String,
    pub date: String,
    pub description: String,
    pub content: String,
}

impl PostView {
    pub fn from_document(raw: &str) -> Self {
        let fm = parse_frontmatter(raw);
        let field = |key: &str| fm.metadata.get_non_blank(key).map(str::to_string);
        Self {
            title: field("title").unwrap_or_else(|| UNTITLED.to_string()),
            date: field("date").unwrap_or_default(),
            description: field("description").unwrap_or_default(),
            content: fm.body.clone(),
        }
    }
}

/// Loads `slug` if the catalog lets `env` see it; `Ok(None)` means not found.
pub fn load_post(
    catalog: &Catalog,
    root: &Path,
    slug: &str,
    env: Environment,
) -> Result<Option<PostView>> {
    let Some(entry) = catalog.find(slug) else {
        return Ok(None);
    };
    if !catalog.is_accessible(slug, env) {
        tracing::info!(slug, ?env, "post not accessible");
        return Ok(None);
    }

    let path = content::document_path(root, entry.status.folder(), slug)?;
    Ok(content::read_document(&path)?.map(|raw| PostView::from_document(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_frontmatter() {
        let view = PostView::from_document("Just text.");
        assert_eq!(view.title, UNTITLED);
        assert_eq!(view.date, "");
        assert_eq!(view.content, "Just text.");
    }

    #[test]
    fn test_from_document() {
        let view = PostView::from_document("---\ntitle: 'Hi'\ndate: 2024-12-19\n---\n\nBody\n");
        assert_eq!(view.title, "Hi");
        assert_eq!(view.date, "2024-12-19");
        assert_eq!(view.description, "");
        assert_eq!(view.content, "Body");
    }

    #[test]
    fn test_serializes_for_json_output() {
        let view = PostView::from_document("---\ntitle: Hi\n---\nBody.");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Hi");
        assert_eq!(json["date"], "");
        assert_eq!(json["content"], "Body.");
    }

    #[test]
    fn test_load_post_respects_environment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drafts/wip/index.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "---\ntitle: WIP\n---\nSoon.").unwrap();
        let catalog = Catalog::from_yaml("drafts:\n  - slug: wip\n    title: WIP\n").unwrap();

        let dev = load_post(&catalog, dir.path(), "wip", Environment::Development).unwrap();
        assert_eq!(dev.unwrap().content, "Soon.");

        let prod = load_post(&catalog, dir.path(), "wip", Environment::Production).unwrap();
        assert!(prod.is_none());

        let unknown = load_post(&catalog, dir.path(), "nope", Environment::Development).unwrap();
        assert!(unknown.is_none());
    }
}
