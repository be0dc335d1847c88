//! The list of posts the site knows about.
//!
//! A catalog is loaded once, either from a YAML file:
//!
//! ```yaml
//! published:
//!   - slug: hello-world
//!     title: Hello World
//!     description: First post
//!     date: 2024-12-19
//! drafts:
//!   - slug: next-thing
//!     title: Next Thing
//!     description: Work in progress
//! ```
//!
//! or by walking the content tree. It is never mutated afterwards; what a
//! reader may see depends only on the [`Environment`] passed in.

use crate::content::{self, Folder};
use crate::date::Date;
use crate::error::{Error, Result};
use crate::frontmatter::parse_frontmatter;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn shows_drafts(self) -> bool {
        self == Environment::Development
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    Published { date: Date },
    Draft,
}

impl PostStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, PostStatus::Published { .. })
    }

    pub fn folder(&self) -> Folder {
        match self {
            PostStatus::Published { .. } => Folder::Published,
            PostStatus::Draft => Folder::Drafts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub status: PostStatus,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    published: Vec<PublishedRecord>,
    #[serde(default)]
    drafts: Vec<DraftRecord>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PublishedRecord {
    slug: String,
    title: String,
    #[serde(default)]
    description: String,
    date: Date,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DraftRecord {
    slug: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    posts: Vec<PostEntry>,
}

impl Catalog {
    pub fn new(posts: Vec<PostEntry>) -> Self {
        Self { posts }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let catalog = Self::from_yaml(&text).map_err(|source| Error::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), posts = catalog.posts.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let file: CatalogFile = serde_yaml::from_str(text)?;
        let published = file.published.into_iter().map(|r| PostEntry {
            slug: r.slug,
            title: r.title,
            description: r.description,
            status: PostStatus::Published { date: r.date },
        });
        let drafts = file.drafts.into_iter().map(|r| PostEntry {
            slug: r.slug,
            title: r.title,
            description: r.description,
            status: PostStatus::Draft,
        });
        Ok(Self::new(published.chain(drafts).collect()))
    }

    /// Builds a catalog from the documents under `root`, using their frontmatter.
    pub fn discover(root: &Path) -> Result<Self> {
        let mut posts = Vec::new();

        for doc in content::collect_documents(root) {
            let Some(raw) = content::read_document(&doc.path)? else {
                continue;
            };
            let fm = parse_frontmatter(&raw);
            let status = match doc.folder {
                Folder::Drafts => PostStatus::Draft,
                Folder::Published => match fm.metadata.get("date").map(str::parse::<Date>) {
                    Some(Ok(date)) => PostStatus::Published { date },
                    Some(Err(e)) => {
                        tracing::warn!(slug = %doc.slug, error = %e, "skipping published post");
                        continue;
                    }
                    None => {
                        tracing::warn!(slug = %doc.slug, "skipping published post without a date");
                        continue;
                    }
                },
            };
            posts.push(PostEntry {
                title: fm
                    .metadata
                    .get_non_blank("title")
                    .unwrap_or(doc.slug.as_str())
                    .to_string(),
                description: fm.metadata.get("description").unwrap_or_default().to_string(),
                slug: doc.slug,
                status,
            });
        }

        // published first, mirroring the file layout
        posts.sort_by_key(|p| !p.status.is_published());
        Ok(Self::new(posts))
    }

    pub fn posts(&self) -> &[PostEntry] {
        &self.posts
    }

    /// Posts a reader in `env` may see, newest published first and drafts last.
    pub fn visible(&self, env: Environment) -> Vec<&PostEntry> {
        let mut posts: Vec<&PostEntry> = self
            .posts
            .iter()
            .filter(|p| p.status.is_published() || env.shows_drafts())
            .collect();
        posts.sort_by(|a, b| match (&a.status, &b.status) {
            (PostStatus::Draft, PostStatus::Draft) => std::cmp::Ordering::Equal,
            (PostStatus::Draft, _) => std::cmp::Ordering::Greater,
            (_, PostStatus::Draft) => std::cmp::Ordering::Less,
            (PostStatus::Published { date: da }, PostStatus::Published { date: db }) => {
                db.cmp(da)
            }
        });
        posts
    }

    pub fn find(&self, slug: &str) -> Option<&PostEntry> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn is_accessible(&self, slug: &str, env: Environment) -> bool {
        match self.find(slug) {
            None => false,
            Some(post) => post.status.is_published() || env.shows_drafts(),
        }
    }
}
