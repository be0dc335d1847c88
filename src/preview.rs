//! Social preview pages.
//!
//! Link unfurlers do not run the site's scripts, so each published post gets
//! a static page carrying Open Graph and Twitter card tags which immediately
//! redirects real browsers to the post itself.

use crate::content::{self, Folder};
use crate::excerpt::derive_excerpt;
use crate::frontmatter::parse_frontmatter;
use std::path::Path;

pub const DEFAULT_HOST: &str = "nicita.cc";
pub const DEFAULT_PROTO: &str = "https";
pub const FALLBACK_TITLE: &str = "Blog Post";
pub const FALLBACK_DESCRIPTION: &str = "Read the latest article.";

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("missing slug")]
    MissingSlug,
    #[error("not found")]
    NotFound,
    #[error("failed to read content: {0}")]
    Read(#[source] crate::Error),
}

impl PreviewError {
    /// HTTP status this error corresponds to.
    pub fn status_code(&self) -> u16 {
        match self {
            PreviewError::MissingSlug => 400,
            PreviewError::NotFound => 404,
            PreviewError::Read(_) => 500,
        }
    }
}

/// What the caller knows about the incoming request.
#[derive(Debug, Clone, Default)]
pub struct PreviewRequest {
    pub slug: String,
    pub host: Option<String>,
    pub forwarded_host: Option<String>,
    pub forwarded_proto: Option<String>,
}

impl PreviewRequest {
    pub fn origin(&self) -> String {
        let host = non_empty(&self.forwarded_host)
            .or(non_empty(&self.host))
            .unwrap_or(DEFAULT_HOST);
        let proto = non_empty(&self.forwarded_proto).unwrap_or(DEFAULT_PROTO);
        format!("{}://{}", proto, host)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolves the published document for `req.slug` and renders its preview page.
pub fn render_preview(root: &Path, req: &PreviewRequest) -> Result<String, PreviewError> {
    if req.slug.is_empty() {
        return Err(PreviewError::MissingSlug);
    }

    let path = content::document_path(root, Folder::Published, &req.slug).map_err(|e| {
        tracing::debug!(error = %e, "rejecting slug");
        PreviewError::NotFound
    })?;
    let raw = content::read_document(&path)
        .map_err(PreviewError::Read)?
        .ok_or(PreviewError::NotFound)?;

    Ok(render_document(&raw, &req.slug, &req.origin()))
}

/// Renders the preview page for an already loaded document.
pub fn render_document(raw: &str, slug: &str, origin: &str) -> String {
    let fm = parse_frontmatter(raw);
    let url = format!("{}/blog/{}", origin, slug);
    let image = format!("{}/og-image.svg", origin);

    let description = match fm.metadata.get_non_blank("description") {
        Some(d) => d.to_string(),
        None => derive_excerpt(&fm.body, 2),
    };
    let title = fm
        .metadata
        .get_non_blank("title")
        .map(str::trim)
        .unwrap_or(FALLBACK_TITLE);
    let description = match description.trim() {
        "" => FALLBACK_DESCRIPTION,
        d => d,
    };

    let title = escape_html(title);
    let description = escape_html(description);
    let image = escape_html(&image);
    let script_url = serde_json::to_string(&url)
        .unwrap_or_default()
        .replace('<', "\\u003c");
    let url = escape_html(&url);

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <meta name="description" content="{description}" />

    <meta property="og:type" content="article" />
    <meta property="og:title" content="{title}" />
    <meta property="og:description" content="{description}" />
    <meta property="og:url" content="{url}" />
    <meta property="og:image" content="{image}" />

    <meta name="twitter:card" content="summary_large_image" />
    <meta name="twitter:title" content="{title}" />
    <meta name="twitter:description" content="{description}" />
    <meta name="twitter:image" content="{image}" />

    <meta http-equiv="refresh" content="0; url={url}" />
  </head>
  <body>
    <p>Redirecting to <a href="{url}">{url}</a>…</p>
    <script>location.replace({script_url});</script>
  </body>
</html>
"#
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with(slug: &str, content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("published").join(slug).join("index.md");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        dir
    }

    #[test]
    fn test_origin() {
        let mut req = PreviewRequest::default();
        assert_eq!(req.origin(), "https://nicita.cc");
        req.host = Some("example.com".into());
        assert_eq!(req.origin(), "https://example.com");
        req.forwarded_host = Some("proxy.example.com".into());
        req.forwarded_proto = Some("http".into());
        assert_eq!(req.origin(), "http://proxy.example.com");
    }

    #[test]
    fn test_render_uses_description() {
        let html = render_document(
            "---\ntitle: Hello\ndescription: A \"quoted\" <desc>\n---\nBody. Text.",
            "hello",
            "https://x.io",
        );
        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains(
            r#"<meta property="og:description" content="A &quot;quoted&quot; &lt;desc&gt;" />"#
        ));
        assert!(html.contains(r#"<meta property="og:url" content="https://x.io/blog/hello" />"#));
        assert!(html.contains(r#"content="https://x.io/og-image.svg""#));
        assert!(html.contains(r#"location.replace("https://x.io/blog/hello");"#));
    }

    #[test]
    fn test_render_falls_back_to_excerpt() {
        let html = render_document(
            "---\ntitle: Hi\ndescription:   \n---\nOne. Two. Three.",
            "hi",
            "https://x.io",
        );
        assert!(html.contains(r#"<meta name="description" content="One. Two." />"#));
    }

    #[test]
    fn test_render_fallbacks() {
        let html = render_document("", "empty", "https://x.io");
        assert!(html.contains("<title>Blog Post</title>"));
        assert!(html.contains("content=\"Read the latest article.\""));
    }

    #[test]
    fn test_render_preview_from_disk() {
        let dir = site_with("hello", "---\ntitle: Hello\n---\nFirst. Second.");
        let req = PreviewRequest {
            slug: "hello".into(),
            ..Default::default()
        };
        let html = render_preview(dir.path(), &req).unwrap();
        assert!(html.contains("https://nicita.cc/blog/hello"));
    }

    #[test]
    fn test_render_preview_errors() {
        let dir = site_with("hello", "x");
        let missing = PreviewRequest::default();
        assert_eq!(render_preview(dir.path(), &missing).unwrap_err().status_code(), 400);

        let unknown = PreviewRequest {
            slug: "nope".into(),
            ..Default::default()
        };
        assert_eq!(render_preview(dir.path(), &unknown).unwrap_err().status_code(), 404);

        let traversal = PreviewRequest {
            slug: "../published/hello".into(),
            ..Default::default()
        };
        assert_eq!(render_preview(dir.path(), &traversal).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href='x'>&"#), "&lt;a href=&#39;x&#39;&gt;&amp;");
    }
}
