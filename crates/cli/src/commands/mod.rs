pub mod new;
pub mod routes;
pub mod translate;
pub mod validate;

use anyhow::{Context, Result};
use blog_kit_core::SiteConfig;
use blog_kit_core::config::{CONFIG_FILE, parse_site_toml};
use std::path::{Path, PathBuf};

/// Load blog.toml from the site root
pub fn load_site(root: &Path) -> Result<SiteConfig> {
    if !root.exists() {
        anyhow::bail!("Site directory does not exist: {}", root.display());
    }

    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun blog-kit from the site root or pass --root",
            CONFIG_FILE,
            root.display()
        );
    }

    parse_site_toml(&config_path).with_context(|| format!("Failed to parse {}", CONFIG_FILE))
}

/// Absolute content root of a site
pub fn content_root(root: &Path, config: &SiteConfig) -> PathBuf {
    root.join(&config.content.root)
}

/// Fail unless `collection` is listed in blog.toml
pub fn ensure_collection(config: &SiteConfig, collection: &str) -> Result<()> {
    if !config.content.has_collection(collection) {
        anyhow::bail!(
            "Unknown collection '{}'. Configured collections: {}",
            collection,
            config.content.collections.join(", ")
        );
    }
    Ok(())
}

/// Fail unless `locale` is listed in blog.toml
pub fn ensure_locale(config: &SiteConfig, locale: &str) -> Result<()> {
    if !config.locales.contains(locale) {
        anyhow::bail!(
            "Unknown locale '{}'. Configured locales: {}",
            locale,
            config.locales.locales().join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    pub const CONFIG: &str = r#"
[site]
url = "https://blog.example.com"
title = "Test Blog"

[i18n]
locales = ["en", "zh-cn", "ja"]
default_locale = "en"

[content]
root = "content"
collections = ["posts", "notes"]
"#;

    pub fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blog.toml"), CONFIG).unwrap();
        dir
    }

    pub fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
}
