//! Instructions sent to the text-generation service.

use crate::client::GenerationRequest;

/// English name of a locale's language, keyed by primary subtag
pub fn language_name(locale: &str) -> Option<&'static str> {
    let name = match primary_subtag(locale).as_str() {
        "en" => "English",
        "zh" => match locale.to_ascii_lowercase().as_str() {
            "zh-tw" | "zh-hk" | "zh-hant" => "Traditional Chinese",
            _ => "Simplified Chinese",
        },
        "ja" => "Japanese",
        "ko" => "Korean",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "it" => "Italian",
        "ru" => "Russian",
        _ => return None,
    };
    Some(name)
}

/// Lowercased language part of a locale code (`zh-CN` → `zh`)
pub fn primary_subtag(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_ascii_lowercase()
}

fn describe(locale: &str) -> String {
    match language_name(locale) {
        Some(name) => format!("{} ({})", name, locale),
        None => format!("the language with locale code '{}'", locale),
    }
}

/// Request for a short frontmatter field such as a title
pub fn field_request(text: &str, target: &str) -> GenerationRequest {
    GenerationRequest {
        system: format!(
            "You are a professional translator for a technical blog. \
             Translate the user's text into {}. Keep the meaning and tone faithful. \
             Return only the translated text, without quotes, notes or explanations.",
            describe(target)
        ),
        user: text.to_string(),
    }
}

/// Request for a full markdown body
pub fn body_request(body: &str, target: &str) -> GenerationRequest {
    GenerationRequest {
        system: format!(
            "You are a professional translator for a technical blog. \
             Translate the user's markdown document into {}.\n\
             Rules:\n\
             1. Keep all markdown syntax exactly as it is: headings, lists, tables, links, images, emphasis, blockquotes and HTML/MDX tags.\n\
             2. Do not translate or change fenced code blocks or inline code.\n\
             3. Do not change URLs, link targets, image paths or anchors.\n\
             4. Keep callout markers such as `> [!NOTE]`, `> [!TIP]`, `> [!WARNING]` and `:::note` verbatim; translate only the text inside them.\n\
             5. Translate prose, headings, list items, table cell text and image alt text.\n\
             6. Return only the translated markdown, without wrapping it in a code block and without any commentary.",
            describe(target)
        ),
        user: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("en"), Some("English"));
        assert_eq!(language_name("zh-cn"), Some("Simplified Chinese"));
        assert_eq!(language_name("zh-TW"), Some("Traditional Chinese"));
        assert_eq!(language_name("ja_JP"), Some("Japanese"));
        assert_eq!(language_name("tlh"), None);
        assert_eq!(primary_subtag("pt-BR"), "pt");
        assert_eq!(primary_subtag(""), "");
    }

    #[test]
    fn test_requests_name_the_target() {
        let request = field_request("Hello", "ja");
        assert!(request.system.contains("Japanese (ja)"));
        assert_eq!(request.user, "Hello");

        let request = body_request("# Hi\n", "tlh");
        assert!(request.system.contains("locale code 'tlh'"));
        assert!(request.system.contains("fenced code blocks"));
        assert_eq!(request.user, "# Hi\n");
    }
}
