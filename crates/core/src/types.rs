use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, PathBuf};

/// Complete site configuration
#[derive(Debug, Clone, Serialize)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub locales: LocaleSet,
    pub content: ContentConfig,
    pub translation: TranslationConfig,
}

impl SiteConfig {
    /// Absolute URL of an article in the given locale.
    ///
    /// The default locale is served without a prefix, every other locale
    /// under `/<locale>/`.
    pub fn article_url(&self, collection: &str, slug: &str, locale: &str) -> String {
        let resolver = crate::locale::LocaleResolver::new(&self.locales);
        let path = resolver.localized_path(locale, &format!("{}/{}/", collection, slug));
        format!("{}{}", self.site.url.trim_end_matches('/'), path)
    }
}

/// Site identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub url: String,
    pub title: String,
}

/// Ordered set of locale codes with one designated default.
///
/// Never empty, and the default is always a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleSet {
    locales: Vec<String>,
    default_locale: String,
}

impl LocaleSet {
    pub fn new(locales: Vec<String>, default_locale: impl Into<String>) -> Result<Self> {
        let default_locale = default_locale.into();

        if locales.is_empty() {
            return Err(Error::ConfigParse(
                "i18n.locales must list at least one locale".to_string(),
            ));
        }

        if let Some(bad) = locales.iter().find(|l| l.trim().is_empty() || l.contains('/')) {
            return Err(Error::ConfigParse(format!(
                "Invalid locale code '{}' in i18n.locales",
                bad
            )));
        }

        for (i, locale) in locales.iter().enumerate() {
            if locales[..i].contains(locale) {
                return Err(Error::ConfigParse(format!(
                    "Duplicate locale '{}' in i18n.locales",
                    locale
                )));
            }
        }

        if !locales.contains(&default_locale) {
            return Err(Error::ConfigParse(format!(
                "i18n.default_locale '{}' is not listed in i18n.locales {:?}",
                default_locale, locales
            )));
        }

        Ok(Self {
            locales,
            default_locale,
        })
    }

    /// Convenience constructor for a site with one language
    pub fn single(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        Self {
            locales: vec![locale.clone()],
            default_locale: locale,
        }
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    pub fn is_single(&self) -> bool {
        self.locales.len() == 1
    }
}

/// Where content lives on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root, relative to the site root
    pub root: PathBuf,
    pub collections: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("src/content"),
            collections: vec!["posts".to_string(), "notes".to_string(), "pages".to_string()],
        }
    }
}

impl ContentConfig {
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.iter().any(|c| c == name)
    }

    /// Check that the content root stays under the site directory and that
    /// every collection is a plain directory name.
    pub fn validate(&self) -> Result<()> {
        let inside_site = self
            .root
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if self.root.as_os_str().is_empty() || !inside_site {
            return Err(Error::ConfigParse(format!(
                "content.root must stay inside the site directory, got '{}'",
                self.root.display()
            )));
        }

        if self.collections.is_empty() {
            return Err(Error::ConfigParse(
                "content.collections must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self.collections.iter().find(|c| !is_directory_name(c)) {
            return Err(Error::ConfigParse(format!(
                "Invalid collection name '{}' in content.collections",
                bad
            )));
        }

        Ok(())
    }
}

fn is_directory_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Text-generation service settings (credentials come from the environment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.3,
            timeout_secs: 300,
        }
    }
}
