use anyhow::{Context, Result};
use blog_kit_content::{ArticleRecord, scan_collection};
use blog_kit_core::SiteConfig;
use blog_kit_translator::{ArticleTranslator, ClientConfig, OpenAiClient};
use std::path::PathBuf;
use tracing::debug;

use super::{content_root, ensure_collection, ensure_locale, load_site};

/// Translate one article into the requested locales.
///
/// Locales are processed one at a time. A locale that already exists is
/// skipped; a locale whose body translation fails is reported and the rest
/// still run. The command fails if any locale failed.
pub async fn run(
    root: PathBuf,
    collection: String,
    slug: String,
    from: Option<String>,
    to: Vec<String>,
    strict_code_blocks: bool,
) -> Result<()> {
    let config = load_site(&root)?;
    ensure_collection(&config, &collection)?;

    if config.locales.is_single() {
        anyhow::bail!(
            "Site has a single locale ('{}'); there is nothing to translate into",
            config.locales.default_locale()
        );
    }

    let articles = scan_collection(&content_root(&root, &config), &collection)
        .with_context(|| format!("Failed to scan collection '{}'", collection))?;
    let Some(article) = articles.get(&slug) else {
        let available: Vec<&str> = articles.keys().map(String::as_str).collect();
        anyhow::bail!(
            "Article '{}' not found in '{}'. Available: {}",
            slug,
            collection,
            if available.is_empty() {
                "(none)".to_string()
            } else {
                available.join(", ")
            }
        );
    };

    let source = resolve_source(&config, article, from)?;
    let targets = resolve_targets(&config, article, &source, to)?;

    println!("🌐 Translating {}/{}", collection, slug);
    println!("   From: {}", source);
    if targets.is_empty() {
        println!("   ✓ Every configured locale already exists, nothing to do");
        return Ok(());
    }
    println!("   To:   {}", targets.join(", "));
    println!();

    let env_file = root.join(".env");
    if env_file.exists() {
        dotenvy::from_path(&env_file)
            .with_context(|| format!("Failed to read {}", env_file.display()))?;
        debug!(path = %env_file.display(), "loaded environment file");
    }

    let client_config = ClientConfig::from_env(&config.translation)?;
    let client = OpenAiClient::new(client_config).context("Failed to create API client")?;
    println!("   Model: {}", client.model());

    let translator = ArticleTranslator::new(&client, &config).strict_code_blocks(strict_code_blocks);
    let report = translator.translate_article(article, &source, &targets).await?;

    println!();
    for (locale, path) in &report.written {
        println!("   ✓ {} → {}", locale, path.display());
    }
    for locale in &report.skipped {
        println!("   ⚠ {} already exists, skipped", locale);
    }
    for (locale, reason) in &report.failed {
        eprintln!("   ✗ {}: {}", locale, reason);
    }

    println!();
    println!(
        "Done: {} written, {} skipped, {} failed",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );

    if report.has_failures() {
        anyhow::bail!(
            "Translation failed for {} locale(s); rerun to retry, finished locales are skipped",
            report.failed.len()
        );
    }

    Ok(())
}

/// Source locale: the requested one, else the default locale when the
/// article has it, else the article's first locale.
fn resolve_source(
    config: &SiteConfig,
    article: &ArticleRecord,
    from: Option<String>,
) -> Result<String> {
    if let Some(from) = from {
        ensure_locale(config, &from)?;
        if !article.has_locale(&from) {
            anyhow::bail!(
                "Article '{}' has no '{}' version. Available: {}",
                article.slug,
                from,
                article.locales.keys().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        return Ok(from);
    }

    let default = config.locales.default_locale();
    if article.has_locale(default) {
        return Ok(default.to_string());
    }

    article
        .locales
        .keys()
        .next()
        .cloned()
        .context("Article has no locale files")
}

/// Target locales: the requested ones, else every configured locale the
/// article lacks.
///
/// Requested locales that already exist are kept so the translator reports
/// them as skipped.
fn resolve_targets(
    config: &SiteConfig,
    article: &ArticleRecord,
    source: &str,
    to: Vec<String>,
) -> Result<Vec<String>> {
    if to.is_empty() {
        return Ok(config
            .locales
            .locales()
            .iter()
            .filter(|l| !article.has_locale(l))
            .cloned()
            .collect());
    }

    let mut targets = Vec::new();
    for locale in to {
        ensure_locale(config, &locale)?;
        if locale == source {
            anyhow::bail!("Cannot translate '{}' into itself", source);
        }
        if !targets.contains(&locale) {
            targets.push(locale);
        }
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{site, write};
    use super::*;

    fn demo(layouts: &[&str]) -> (tempfile::TempDir, SiteConfig, ArticleRecord) {
        let dir = site();
        for layout in layouts {
            write(
                dir.path(),
                &format!("content/posts/demo/{}", layout),
                "---\ntitle: Demo\n---\nbody\n",
            );
        }
        let config = load_site(dir.path()).unwrap();
        let article = scan_collection(&content_root(dir.path(), &config), "posts").unwrap()
            ["demo"]
            .clone();
        (dir, config, article)
    }

    #[test]
    fn test_source_defaults_to_default_locale() {
        let (_dir, config, article) = demo(&["ja.md", "en.md"]);
        assert_eq!(resolve_source(&config, &article, None).unwrap(), "en");

        let (_dir, config, article) = demo(&["zh-cn.md", "ja.md"]);
        assert_eq!(resolve_source(&config, &article, None).unwrap(), "ja");
    }

    #[test]
    fn test_explicit_source_must_exist() {
        let (_dir, config, article) = demo(&["en.md"]);
        assert_eq!(
            resolve_source(&config, &article, Some("en".into())).unwrap(),
            "en"
        );
        assert!(resolve_source(&config, &article, Some("ja".into())).is_err());
        assert!(resolve_source(&config, &article, Some("fr".into())).is_err());
    }

    #[test]
    fn test_targets_default_to_missing_locales() {
        let (_dir, config, article) = demo(&["en.md", "ja.md"]);
        assert_eq!(
            resolve_targets(&config, &article, "en", vec![]).unwrap(),
            vec!["zh-cn"]
        );
    }

    #[test]
    fn test_explicit_targets() {
        let (_dir, config, article) = demo(&["en.md", "ja.md"]);
        assert_eq!(
            resolve_targets(&config, &article, "en", vec!["ja".into(), "zh-cn".into(), "ja".into()])
                .unwrap(),
            vec!["ja", "zh-cn"]
        );
        assert!(resolve_targets(&config, &article, "en", vec!["fr".into()]).is_err());
        assert!(resolve_targets(&config, &article, "en", vec!["en".into()]).is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_translation() {
        // SAFETY: no other test in this binary reads OPENAI_API_KEY
        unsafe { std::env::remove_var("OPENAI_API_KEY") };
        let (dir, _config, _article) = demo(&["en.md"]);

        let err = run(
            dir.path().to_path_buf(),
            "posts".into(),
            "demo".into(),
            None,
            vec!["ja".into()],
            false,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert!(!dir.path().join("content/posts/demo/ja.md").exists());
    }

    #[tokio::test]
    async fn test_unknown_article() {
        let (dir, _config, _article) = demo(&["en.md"]);
        let err = run(
            dir.path().to_path_buf(),
            "posts".into(),
            "missing".into(),
            None,
            vec![],
            false,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Available: demo"));
    }
}
