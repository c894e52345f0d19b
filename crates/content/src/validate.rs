use crate::error::{ContentError, Result};
use crate::frontmatter::Document;
use crate::scanner::{ArticleRecord, StorageShape, content_files, scan_collection};
use blog_kit_core::SiteConfig;
use std::path::Path;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every collection under the configured content root.
///
/// Problems with individual files go into the report; only failures to read
/// the directory tree itself are returned as errors.
pub fn validate_content(config: &SiteConfig, site_root: &Path) -> Result<ValidationReport> {
    let content_root = site_root.join(&config.content.root);
    let mut report = ValidationReport::default();

    if !content_root.is_dir() {
        report.errors.push(format!(
            "Content root does not exist: {}",
            content_root.display()
        ));
        return Ok(report);
    }

    for collection in &config.content.collections {
        if config.locales.is_single() {
            check_files(&content_root, collection, &mut report)?;
            continue;
        }

        let articles = scan_collection(&content_root, collection)?;
        report
            .info
            .push(format!("{}: {} article(s)", collection, articles.len()));

        for article in articles.values() {
            check_article(config, article, &mut report);
        }
    }

    Ok(report)
}

/// Single-locale sites have no per-locale layout; check each file on its own.
fn check_files(content_root: &Path, collection: &str, report: &mut ValidationReport) -> Result<()> {
    let files = content_files(content_root, collection)?;
    report
        .info
        .push(format!("{}: {} file(s)", collection, files.len()));

    for path in files {
        let name = path
            .strip_prefix(content_root)
            .unwrap_or(&path)
            .display()
            .to_string();
        check_document(&name, Document::read(&path), report);
    }
    Ok(())
}

fn check_article(config: &SiteConfig, article: &ArticleRecord, report: &mut ValidationReport) {
    let name = format!("{}/{}", article.collection, article.slug);
    let locales = &config.locales;

    if !article.has_locale(locales.default_locale()) {
        report.warnings.push(format!(
            "{}: no version in default locale '{}'",
            name,
            locales.default_locale()
        ));
    }

    let mut shapes = article.locales.values();
    if let Some(first) = shapes.next()
        && shapes.any(|s| s != first)
    {
        let flat: Vec<&str> = article
            .locales
            .iter()
            .filter(|(_, s)| **s == StorageShape::Flat)
            .map(|(l, _)| l.as_str())
            .collect();
        report.warnings.push(format!(
            "{}: mixes flat and directory storage (flat: {})",
            name,
            flat.join(", ")
        ));
    }

    for locale in article.locales.keys() {
        if !locales.contains(locale) {
            report.errors.push(format!(
                "{}: locale '{}' is not configured in i18n.locales",
                name, locale
            ));
        }

        let document = article
            .source_path(locale)
            .and_then(|path| Document::read(&path));
        check_document(&format!("{} [{}]", name, locale), document, report);
    }
}

fn check_document(name: &str, document: Result<Document>, report: &mut ValidationReport) {
    match document {
        Ok(doc) => {
            if doc.get_str("title").is_none_or(|t| t.trim().is_empty()) {
                report.warnings.push(format!("{}: missing title", name));
            }
        }
        Err(ContentError::Frontmatter { message, .. }) => {
            report
                .errors
                .push(format!("{}: invalid frontmatter: {}", name, message));
        }
        Err(e) => report.errors.push(format!("{}: {}", name, e)),
    }
}
