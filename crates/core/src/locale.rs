//! Locale and route derivation from content identifiers.
//!
//! A content identifier is a `/`-separated path such as `tech/hello-world/ja`.
//! When the site has more than one locale the final segment is always the
//! locale code; a single-locale site has no locale segment at all.
//!
//! Nothing here fails: malformed identifiers fall back to the default
//! locale or pass through unchanged.

use crate::types::LocaleSet;

const SEPARATOR: char = '/';

/// Routing parameters for one content entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    /// `None` for entries served without a locale prefix
    pub locale: Option<String>,
    pub path: String,
}

/// Maps content identifiers to locales, paths and routes.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    default_locale: String,
    single_locale: bool,
}

impl LocaleResolver {
    pub fn new(locales: &LocaleSet) -> Self {
        Self {
            default_locale: locales.default_locale().to_string(),
            single_locale: locales.is_single(),
        }
    }

    pub fn is_single_locale(&self) -> bool {
        self.single_locale
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Last segment of `id`, or the default locale when it is empty.
    ///
    /// In single-locale mode the result is not a locale; callers route
    /// through [`Self::to_route_params`] instead.
    pub fn extract_locale<'a>(&'a self, id: &'a str) -> &'a str {
        let last = match id.rsplit_once(SEPARATOR) {
            Some((_, last)) => last,
            None => id,
        };

        if last.is_empty() {
            &self.default_locale
        } else {
            last
        }
    }

    /// `id` without its locale segment.
    pub fn extract_path<'a>(&self, id: &'a str) -> &'a str {
        if self.single_locale {
            return id;
        }

        match id.rsplit_once(SEPARATOR) {
            Some((path, _)) => path,
            None => "",
        }
    }

    pub fn belongs_to_locale(&self, id: &str, locale: &str) -> bool {
        self.single_locale || self.extract_locale(id) == locale
    }

    pub fn to_route_params(&self, id: &str) -> RouteParams {
        if self.single_locale {
            return RouteParams {
                locale: None,
                path: id.to_string(),
            };
        }

        let locale = self.extract_locale(id);
        RouteParams {
            locale: (locale != self.default_locale).then(|| locale.to_string()),
            path: self.extract_path(id).to_string(),
        }
    }

    /// URL prefix for `locale`: empty for the default locale, `/<locale>` otherwise.
    pub fn locale_prefix(&self, locale: &str) -> String {
        if self.single_locale || locale == self.default_locale || locale.is_empty() {
            String::new()
        } else {
            format!("{}{}", SEPARATOR, locale)
        }
    }

    /// Site-absolute path of `path` in `locale`, always starting with `/`.
    pub fn localized_path(&self, locale: &str, path: &str) -> String {
        let path = path.trim_start_matches(SEPARATOR);
        format!("{}{}{}", self.locale_prefix(locale), SEPARATOR, path)
    }

    /// Site-absolute route for a content identifier under `base`
    /// (usually the collection name).
    pub fn route_path(&self, base: &str, id: &str) -> String {
        let params = self.to_route_params(id);
        let locale = params.locale.as_deref().unwrap_or(&self.default_locale);
        let segments: Vec<&str> = [base, params.path.as_str()]
            .into_iter()
            .flat_map(|s| s.split(SEPARATOR))
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            return self.localized_path(locale, "");
        }
        self.localized_path(locale, &format!("{}{}", segments.join("/"), SEPARATOR))
    }
}
