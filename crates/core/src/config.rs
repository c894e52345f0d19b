use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file at the site root
pub const CONFIG_FILE: &str = "blog.toml";

/// Raw TOML configuration structure
/// This matches the blog.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    i18n: RawI18n,
    #[serde(default)]
    content: Option<RawContent>,
    #[serde(default)]
    translation: Option<RawTranslation>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    url: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct RawI18n {
    locales: Vec<String>,
    default_locale: String,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    root: Option<String>, // Convert to PathBuf
    collections: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawTranslation {
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

/// Parse blog.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse blog.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if !raw.site.url.starts_with("http://") && !raw.site.url.starts_with("https://") {
        return Err(Error::ConfigParse(format!(
            "site.url must be an absolute http(s) URL, got '{}'",
            raw.site.url
        )));
    }

    let locales = LocaleSet::new(raw.i18n.locales, raw.i18n.default_locale)?;

    let mut content_config = ContentConfig::default();
    if let Some(content) = raw.content {
        if let Some(root) = content.root {
            content_config.root = PathBuf::from(root);
        }
        if let Some(collections) = content.collections {
            content_config.collections = collections;
        }
    }
    content_config.validate()?;

    let mut translation = TranslationConfig::default();
    if let Some(raw_translation) = raw.translation {
        if let Some(model) = raw_translation.model {
            translation.model = model;
        }
        if let Some(base_url) = raw_translation.base_url {
            translation.base_url = base_url;
        }
        if let Some(temperature) = raw_translation.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(Error::ConfigParse(format!(
                    "translation.temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
            translation.temperature = temperature;
        }
        if let Some(timeout_secs) = raw_translation.timeout_secs {
            translation.timeout_secs = timeout_secs;
        }
    }

    Ok(SiteConfig {
        site: SiteInfo {
            url: raw.site.url,
            title: raw.site.title,
        },
        locales,
        content: content_config,
        translation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[site]
url = "https://blog.example.com"
title = "Test Blog"

[i18n]
locales = ["en", "zh-cn", "ja"]
default_locale = "en"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(config.site.title, "Test Blog");
        assert_eq!(config.locales.locales().len(), 3);
        assert_eq!(config.locales.default_locale(), "en");
        assert!(!config.locales.is_single());
        assert_eq!(config.content.root, PathBuf::from("src/content"));
        assert!(config.content.has_collection("posts"));
        assert_eq!(config.translation.model, "gpt-4o-mini");
        assert_eq!(config.translation.timeout_secs, 300);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
url = "https://blog.example.com"
title = "Test Blog"

[i18n]
locales = ["ja"]
default_locale = "ja"

[content]
root = "content"
collections = ["blog", "til"]

[translation]
model = "gpt-4o"
base_url = "http://localhost:11434/v1"
temperature = 0.1
timeout_secs = 60
"#;
        let config = parse_site_toml_str(toml).unwrap();
        assert!(config.locales.is_single());
        assert_eq!(config.content.root, PathBuf::from("content"));
        assert_eq!(config.content.collections, vec!["blog", "til"]);
        assert_eq!(config.translation.model, "gpt-4o");
        assert_eq!(config.translation.base_url, "http://localhost:11434/v1");
        assert_eq!(config.translation.timeout_secs, 60);
    }

    #[test]
    fn test_rejects_default_outside_locales() {
        let toml = MINIMAL.replace("default_locale = \"en\"", "default_locale = \"fr\"");
        let result = parse_site_toml_str(&toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("default_locale"));
    }

    #[test]
    fn test_rejects_relative_site_url() {
        let toml = MINIMAL.replace("https://blog.example.com", "blog.example.com");
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_content_root_traversal() {
        let toml = format!("{}\n[content]\nroot = \"../elsewhere\"\n", MINIMAL);
        let result = parse_site_toml_str(&toml);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("content.root must stay inside the site")
        );

        for bad in ["/etc", "", "content/../.."] {
            let toml = format!("{}\n[content]\nroot = \"{}\"\n", MINIMAL, bad);
            assert!(parse_site_toml_str(&toml).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_rejects_bad_collection_names() {
        for bad in ["", "\"\"", "\"a/b\"", "\".hidden\""] {
            let toml = format!("{}\n[content]\ncollections = [{}]\n", MINIMAL, bad);
            assert!(parse_site_toml_str(&toml).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let toml = format!("{}\n[translation]\ntemperature = 3.5\n", MINIMAL);
        assert!(parse_site_toml_str(&toml).is_err());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let result = parse_site_toml_str("[site]\nurl = \"https://x.dev\"\ntitle = \"x\"\n");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }
}
