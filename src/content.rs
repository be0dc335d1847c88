//! Where post documents live on disk.
//!
//! ```text
//! <root>/published/<slug>/index.md
//! <root>/drafts/<slug>/index.md
//! ```

use crate::error::{Error, Result};
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const PUBLISHED_DIR: &str = "published";
pub const DRAFTS_DIR: &str = "drafts";
pub const DOCUMENT_NAME: &str = "index.md";

/// Which half of the content tree a document sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Published,
    Drafts,
}

impl Folder {
    pub fn dir_name(self) -> &'static str {
        match self {
            Folder::Published => PUBLISHED_DIR,
            Folder::Drafts => DRAFTS_DIR,
        }
    }
}

/// A document found by [`collect_documents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub folder: Folder,
    pub slug: String,
    pub path: PathBuf,
}

pub fn validate_slug(slug: &str) -> Result<()> {
    let mut components = Path::new(slug).components();
    let single_normal = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if slug.is_empty() || !single_normal || slug.contains(['/', '\\']) {
        return Err(Error::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

pub fn document_path(root: &Path, folder: Folder, slug: &str) -> Result<PathBuf> {
    validate_slug(slug)?;
    Ok(root.join(folder.dir_name()).join(slug).join(DOCUMENT_NAME))
}

/// Reads a document, mapping a missing file to `Ok(None)`.
pub fn read_document(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Finds every `<folder>/<slug>/index.md` under `root`, honoring `.gitignore`.
pub fn collect_documents(root: &Path) -> Vec<DocumentRef> {
    let mut documents = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .max_depth(Some(3))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || path.file_name().map_or(true, |n| n != DOCUMENT_NAME) {
            continue;
        }
        if let Some(doc) = classify(root, path) {
            documents.push(doc);
        }
    }

    tracing::debug!(root = %root.display(), count = documents.len(), "collected documents");
    documents
}

fn classify(root: &Path, path: &Path) -> Option<DocumentRef> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    let [folder, slug, _] = parts.as_slice() else {
        return None;
    };
    let folder = match *folder {
        PUBLISHED_DIR => Folder::Published,
        DRAFTS_DIR => Folder::Drafts,
        _ => return None,
    };
    Some(DocumentRef {
        folder,
        slug: slug.to_string(),
        path: path.to_path_buf(),
    })
}
