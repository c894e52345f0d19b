//! Translation of one article into one or more locales.
//!
//! Title and description are best-effort: a failed call keeps the source
//! text. The body is not: a failed or empty body translation abandons that
//! locale and nothing is written for it.

use crate::client::TextGenerator;
use crate::disclaimer::{disclaimer, with_disclaimer};
use crate::error::{Result, TranslateError};
use crate::prompt::{body_request, field_request};
use crate::verify::{code_block_mismatch, fenced_code_blocks};
use blog_kit_content::{ArticleRecord, ContentError, Document};
use blog_kit_core::SiteConfig;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Frontmatter fields translated alongside the body
const TRANSLATED_FIELDS: &[&str] = &["title", "description"];

/// Outcome of translating one article into several locales
#[derive(Debug, Default)]
pub struct TranslationReport {
    /// Locale and the file written for it
    pub written: Vec<(String, PathBuf)>,
    /// Locales that already existed
    pub skipped: Vec<String>,
    /// Locale and the reason it failed
    pub failed: Vec<(String, String)>,
}

impl TranslationReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub struct ArticleTranslator<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
    config: &'a SiteConfig,
    strict_code_blocks: bool,
}

impl<'a, G: TextGenerator + ?Sized> ArticleTranslator<'a, G> {
    pub fn new(generator: &'a G, config: &'a SiteConfig) -> Self {
        Self {
            generator,
            config,
            strict_code_blocks: false,
        }
    }

    /// Treat altered fenced code blocks as a failure instead of a warning
    pub fn strict_code_blocks(mut self, strict: bool) -> Self {
        self.strict_code_blocks = strict;
        self
    }

    /// Translate `article` from `source` into each of `targets`, in order.
    ///
    /// Errors reading the source abort everything; anything that goes wrong
    /// for a single target is recorded in the report and the next target is
    /// attempted.
    pub async fn translate_article(
        &self,
        article: &ArticleRecord,
        source: &str,
        targets: &[String],
    ) -> Result<TranslationReport> {
        let source_path = article.source_path(source)?;
        let document = Document::read(&source_path)?;
        let mut report = TranslationReport::default();

        for target in targets {
            match self.translate_locale(article, source, &document, target).await {
                Ok(path) => {
                    info!(locale = %target, path = %path.display(), "translation written");
                    report.written.push((target.clone(), path));
                }
                Err(TranslateError::AlreadyExists(path)) => {
                    warn!(
                        locale = %target,
                        path = %path.display(),
                        "locale already exists, skipping"
                    );
                    report.skipped.push(target.clone());
                }
                Err(e) => {
                    warn!(locale = %target, error = %e, "translation failed");
                    report.failed.push((target.clone(), e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Translate one locale and write it, returning the new file's path.
    pub async fn translate_locale(
        &self,
        article: &ArticleRecord,
        source: &str,
        document: &Document,
        target: &str,
    ) -> Result<PathBuf> {
        if article.has_locale(target) {
            let existing = article
                .source_path(target)
                .unwrap_or_else(|_| article.dir.join(target));
            return Err(TranslateError::AlreadyExists(existing));
        }

        let mut translated = document.clone();
        for field in TRANSLATED_FIELDS {
            if let Some(text) = document.get_str(field) {
                let value = self.translate_field(field, text, target).await;
                translated.set_str(field, value);
            }
        }

        let body = self.translate_body(&document.body, target).await?;

        if let Some(mismatch) = code_block_mismatch(&document.body, &body) {
            if self.strict_code_blocks {
                return Err(TranslateError::CodeBlocksChanged(mismatch));
            }
            warn!(locale = %target, "{}", mismatch);
        }

        let source_url = self
            .config
            .article_url(&article.collection, &article.slug, source);
        translated.body = with_disclaimer(&disclaimer(source, target, &source_url), &body);

        let locale_dir = article.dir.join(target);
        let fresh_dir = !locale_dir.exists();
        let path = article.target_path(source, target)?;
        if path.exists() {
            return Err(TranslateError::AlreadyExists(path));
        }

        match translated.write_new(&path) {
            Ok(()) => Ok(path),
            Err(e) => {
                if fresh_dir && locale_dir.is_dir() {
                    // remove_dir only succeeds while the directory is empty
                    if let Err(cleanup) = fs::remove_dir(&locale_dir) {
                        debug!(
                            dir = %locale_dir.display(),
                            error = %cleanup,
                            "left locale directory in place"
                        );
                    }
                }
                match e {
                    ContentError::IoError(io) if io.kind() == std::io::ErrorKind::AlreadyExists => {
                        Err(TranslateError::AlreadyExists(path))
                    }
                    e => Err(e.into()),
                }
            }
        }
    }

    /// Translated field text, or the original when translation fails
    async fn translate_field(&self, field: &str, text: &str, target: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self.generator.generate(&field_request(text, target)).await {
            Ok(translated) if !translated.trim().is_empty() => translated.trim().to_string(),
            Ok(_) => {
                warn!(field, locale = %target, "empty translation, keeping original");
                text.to_string()
            }
            Err(e) => {
                warn!(field, locale = %target, error = %e, "translation failed, keeping original");
                text.to_string()
            }
        }
    }

    async fn translate_body(&self, body: &str, target: &str) -> Result<String> {
        if body.trim().is_empty() {
            return Ok(body.to_string());
        }

        let translated = self.generator.generate(&body_request(body, target)).await?;
        if translated.trim().is_empty() {
            return Err(TranslateError::EmptyResponse);
        }
        Ok(strip_outer_fence(body, &translated))
    }
}

/// Undo a response wrapped in a single ```markdown fence.
///
/// Only applies when the wrapper is the one fenced block the response has
/// beyond those of `source`, so a body that is itself a fenced block stays
/// intact.
fn strip_outer_fence(source: &str, text: &str) -> String {
    if fenced_code_blocks(text).len() != fenced_code_blocks(source).len() + 1 {
        return ensure_trailing_newline(text);
    }

    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return ensure_trailing_newline(text);
    };
    let Some((info, inner)) = rest.split_once('\n') else {
        return ensure_trailing_newline(text);
    };
    let is_markdown_info = matches!(info.trim(), "" | "md" | "markdown" | "mdx");

    match inner.strip_suffix("```") {
        Some(inner) if is_markdown_info && !inner.contains("\n```") => {
            ensure_trailing_newline(inner)
        }
        _ => ensure_trailing_newline(text),
    }
}

fn ensure_trailing_newline(text: &str) -> String {
    let mut text = text.trim_end().to_string();
    text.push('\n');
    text
}
