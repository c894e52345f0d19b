//! Article discovery for a content collection.
//!
//! Layout: `<root>/<collection>/<slug>/<locale>.md` (flat) or
//! `<root>/<collection>/<slug>/<locale>/index.md` (directory). `.mdx` is
//! accepted wherever `.md` is.

use crate::error::{ContentError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];
const INDEX_STEM: &str = "index";

/// How one locale of an article is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageShape {
    /// `<slug>/<locale>.md`
    Flat,
    /// `<slug>/<locale>/index.md`
    Directory,
}

/// One article and the locales it exists in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub collection: String,
    pub slug: String,
    /// The article directory
    pub dir: PathBuf,
    pub locales: BTreeMap<String, StorageShape>,
}

impl ArticleRecord {
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Path of the existing file for `locale`
    pub fn source_path(&self, locale: &str) -> Result<PathBuf> {
        match self.locales.get(locale) {
            Some(StorageShape::Directory) => {
                let dir = self.dir.join(locale);
                Ok(probe_markdown(&dir, INDEX_STEM).unwrap_or_else(|| dir.join("index.md")))
            }
            Some(StorageShape::Flat) => probe_markdown(&self.dir, locale)
                .ok_or_else(|| ContentError::FileNotFound(self.dir.join(format!("{locale}.md")))),
            None => Err(ContentError::FileNotFound(self.dir.join(locale))),
        }
    }

    /// Path to write a new `target` locale, mirroring the storage shape and
    /// extension of `source`.
    ///
    /// For directory-shaped sources the target directory is created.
    pub fn target_path(&self, source: &str, target: &str) -> Result<PathBuf> {
        let source_path = self.source_path(source)?;
        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("md");

        match self.locales.get(source) {
            Some(StorageShape::Directory) => {
                let dir = self.dir.join(target);
                fs::create_dir_all(&dir)?;
                Ok(dir.join(format!("{INDEX_STEM}.{extension}")))
            }
            _ => Ok(self.dir.join(format!("{target}.{extension}"))),
        }
    }
}

/// Scan one collection and return its articles keyed by slug.
///
/// Articles without any locale file are left out. A collection directory
/// that does not exist yields an empty map.
pub fn scan_collection(
    content_root: &Path,
    collection: &str,
) -> Result<BTreeMap<String, ArticleRecord>> {
    let collection_dir = content_root.join(collection);
    let mut articles = BTreeMap::new();

    if !collection_dir.is_dir() {
        debug!(dir = %collection_dir.display(), "collection directory missing");
        return Ok(articles);
    }

    for entry in fs::read_dir(&collection_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(slug) = visible_name(&path) else {
            continue;
        };
        if !path.is_dir() {
            continue;
        }

        let locales = scan_article(&path)?;
        if locales.is_empty() {
            debug!(article = %path.display(), "no locale files, skipping");
            continue;
        }

        articles.insert(
            slug.to_string(),
            ArticleRecord {
                collection: collection.to_string(),
                slug: slug.to_string(),
                dir: path.clone(),
                locales,
            },
        );
    }

    Ok(articles)
}

fn scan_article(dir: &Path) -> Result<BTreeMap<String, StorageShape>> {
    let mut locales = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = visible_name(&path) else {
            continue;
        };

        if path.is_dir() {
            if probe_markdown(&path, INDEX_STEM).is_some()
                && locales.insert(name.to_string(), StorageShape::Directory).is_some()
            {
                warn!(
                    article = %dir.display(),
                    locale = name,
                    "locale stored both flat and as a directory, using the directory"
                );
            }
        } else if path.is_file() && is_markdown(&path) {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if locales.contains_key(stem) {
                if locales[stem] == StorageShape::Directory {
                    warn!(
                        article = %dir.display(),
                        locale = stem,
                        "locale stored both flat and as a directory, using the directory"
                    );
                }
                continue;
            }
            locales.insert(stem.to_string(), StorageShape::Flat);
        }
    }

    Ok(locales)
}

/// Every markdown file in a collection, sorted. Hidden entries are skipped.
pub fn content_files(content_root: &Path, collection: &str) -> Result<Vec<PathBuf>> {
    let collection_dir = content_root.join(collection);
    let mut files = Vec::new();

    if !collection_dir.is_dir() {
        return Ok(files);
    }

    for entry in WalkDir::new(&collection_dir)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => ContentError::IoError(io),
            None => ContentError::IoError(std::io::Error::other("filesystem loop detected")),
        })?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Content identifiers of every markdown file in a collection, sorted.
///
/// `demo/en.md` and `demo/en/index.md` both become `demo/en`.
pub fn content_ids(content_root: &Path, collection: &str) -> Result<Vec<String>> {
    let collection_dir = content_root.join(collection);
    let mut ids: Vec<String> = content_files(content_root, collection)?
        .iter()
        .filter_map(|path| path.strip_prefix(&collection_dir).ok())
        .map(content_id)
        .collect();

    ids.sort();
    ids.dedup();
    Ok(ids)
}

/// Identifier for a path relative to its collection directory
pub fn content_id(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s == INDEX_STEM) {
        segments.pop();
    }
    segments.join("/")
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MARKDOWN_EXTENSIONS.contains(&e))
}

/// `<dir>/<stem>.md`, else `<dir>/<stem>.mdx`, if either exists
fn probe_markdown(dir: &Path, stem: &str) -> Option<PathBuf> {
    MARKDOWN_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

fn visible_name(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.starts_with('.'))
}
