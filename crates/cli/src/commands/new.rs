use anyhow::{Context, Result};
use blog_kit_content::{ContentError, Document, StorageShape, scan_collection};
use chrono::{SecondsFormat, Utc};
use clap::ValueEnum;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{content_root, ensure_collection, ensure_locale, load_site};

const BODY_TEMPLATE: &str = "\n## Introduction\n\nWrite something here.\n";

/// Storage layout for a new article file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// `<slug>/<locale>.md`
    Flat,
    /// `<slug>/<locale>/index.md`
    Directory,
}

impl From<StorageShape> for Layout {
    fn from(shape: StorageShape) -> Self {
        match shape {
            StorageShape::Flat => Layout::Flat,
            StorageShape::Directory => Layout::Directory,
        }
    }
}

/// Options for a new article
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub collection: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub locale: Option<String>,
    pub layout: Option<Layout>,
    pub tags: Vec<String>,
}

/// Scaffold a new article file with frontmatter and a body stub.
///
/// Multi-locale sites get `<slug>/<locale>.md` or `<slug>/<locale>/index.md`;
/// a single-locale site gets `<slug>.md` or `<slug>/index.md`. An article
/// that already has other locales keeps its existing layout.
pub fn run(root: PathBuf, options: NewArticle) -> Result<()> {
    let config = load_site(&root)?;
    ensure_collection(&config, &options.collection)?;
    validate_slug(&options.slug)?;

    if options.title.trim().is_empty() {
        anyhow::bail!("--title must not be empty");
    }

    let locale = options
        .locale
        .clone()
        .unwrap_or_else(|| config.locales.default_locale().to_string());
    ensure_locale(&config, &locale)?;

    let content_root = content_root(&root, &config);
    let collection_dir = content_root.join(&options.collection);

    let path = if config.locales.is_single() {
        single_locale_path(&collection_dir, &options.slug, options.layout)
    } else {
        let articles = scan_collection(&content_root, &options.collection)
            .with_context(|| format!("Failed to scan collection '{}'", options.collection))?;
        let existing = articles
            .get(&options.slug)
            .and_then(|a| a.locales.values().next().copied())
            .map(Layout::from);

        let layout = match (options.layout, existing) {
            (Some(requested), Some(existing)) if requested != existing => {
                anyhow::bail!(
                    "Article '{}' already uses the {:?} layout; refusing to mix layouts",
                    options.slug,
                    existing
                );
            }
            (Some(requested), _) => requested,
            (None, Some(existing)) => existing,
            (None, None) => Layout::Flat,
        };

        let article_dir = collection_dir.join(&options.slug);
        match layout {
            Layout::Flat => article_dir.join(format!("{}.md", locale)),
            Layout::Directory => article_dir.join(&locale).join("index.md"),
        }
    };

    println!("📝 Creating {}", path.display());

    if path.exists() {
        anyhow::bail!(
            "{} already exists\nHint: edit it directly or pick another slug",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let document = scaffold(&options, &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    match document.write_new(&path) {
        Ok(()) => {}
        Err(ContentError::IoError(e)) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            anyhow::bail!("{} already exists", path.display());
        }
        Err(e) => return Err(e).context("Failed to write article"),
    }

    println!("   ✓ Created draft '{}' [{}]", options.title, locale);
    println!();
    println!("Next steps:");
    println!("  1. Write the article and set draft: false");
    if !config.locales.is_single() {
        println!(
            "  2. Translate: blog-kit translate {} {}",
            options.collection, options.slug
        );
    }

    Ok(())
}

fn single_locale_path(collection_dir: &Path, slug: &str, layout: Option<Layout>) -> PathBuf {
    match layout.unwrap_or(Layout::Flat) {
        Layout::Flat => collection_dir.join(format!("{}.md", slug)),
        Layout::Directory => collection_dir.join(slug).join("index.md"),
    }
}

/// Slugs become directory names and URL segments
fn validate_slug(slug: &str) -> Result<()> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if !valid {
        anyhow::bail!(
            "Invalid slug '{}': use lowercase letters, digits and single dashes",
            slug
        );
    }
    Ok(())
}

fn scaffold(options: &NewArticle, published: &str) -> Document {
    let mut frontmatter = Mapping::new();
    frontmatter.insert("title".into(), options.title.trim().into());
    frontmatter.insert("description".into(), options.description.trim().into());
    frontmatter.insert("pubDatetime".into(), published.into());

    let tags: Vec<Value> = options
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(Value::from)
        .collect();
    frontmatter.insert("tags".into(), Value::Sequence(tags));
    frontmatter.insert("draft".into(), Value::Bool(true));

    Document::new(frontmatter, BODY_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{site, write};
    use super::*;

    fn options(slug: &str, layout: Option<Layout>, locale: Option<&str>) -> NewArticle {
        NewArticle {
            collection: "posts".into(),
            slug: slug.into(),
            title: "Hello World".into(),
            description: "First post".into(),
            locale: locale.map(String::from),
            layout,
            tags: vec!["rust".into(), " ".into(), "i18n".into()],
        }
    }

    #[test]
    fn test_creates_flat_article_by_default() {
        let dir = site();
        run(dir.path().to_path_buf(), options("hello", None, None)).unwrap();

        let path = dir.path().join("content/posts/hello/en.md");
        let doc = Document::read(&path).unwrap();
        assert_eq!(doc.get_str("title"), Some("Hello World"));
        assert_eq!(doc.get_str("description"), Some("First post"));
        assert!(doc.get_str("pubDatetime").is_some());
        assert_eq!(doc.frontmatter.get("draft"), Some(&Value::Bool(true)));
        let tags = doc.frontmatter.get("tags").unwrap().as_sequence().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(doc.body, BODY_TEMPLATE);
    }

    #[test]
    fn test_directory_layout() {
        let dir = site();
        run(
            dir.path().to_path_buf(),
            options("hello", Some(Layout::Directory), Some("ja")),
        )
        .unwrap();
        assert!(dir.path().join("content/posts/hello/ja/index.md").exists());
    }

    #[test]
    fn test_follows_existing_layout() {
        let dir = site();
        write(dir.path(), "content/posts/hello/en/index.md", "---\ntitle: x\n---\n");

        run(dir.path().to_path_buf(), options("hello", None, Some("ja"))).unwrap();
        assert!(dir.path().join("content/posts/hello/ja/index.md").exists());

        let err = run(
            dir.path().to_path_buf(),
            options("hello", Some(Layout::Flat), Some("zh-cn")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("refusing to mix layouts"));
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = site();
        write(dir.path(), "content/posts/hello/en.md", "---\ntitle: keep\n---\n");

        let err = run(dir.path().to_path_buf(), options("hello", None, None)).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let doc = Document::read(&dir.path().join("content/posts/hello/en.md")).unwrap();
        assert_eq!(doc.get_str("title"), Some("keep"));
    }

    #[test]
    fn test_rejects_bad_input() {
        let dir = site();
        assert!(run(dir.path().to_path_buf(), options("Hello World", None, None)).is_err());
        assert!(run(dir.path().to_path_buf(), options("-x", None, None)).is_err());
        assert!(run(dir.path().to_path_buf(), options("ok", None, Some("fr"))).is_err());

        let mut bad_collection = options("ok", None, None);
        bad_collection.collection = "drafts".into();
        assert!(run(dir.path().to_path_buf(), bad_collection).is_err());
    }

    #[test]
    fn test_single_locale_paths() {
        let dir = Path::new("posts");
        assert_eq!(single_locale_path(dir, "a", None), dir.join("a.md"));
        assert_eq!(
            single_locale_path(dir, "a", Some(Layout::Directory)),
            dir.join("a").join("index.md")
        );
    }
}
