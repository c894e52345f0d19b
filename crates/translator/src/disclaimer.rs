//! Machine-translation notice placed at the top of translated articles.

use crate::prompt::{language_name, primary_subtag};

/// Notice in the target locale's language, English when there is no template.
pub fn disclaimer(source_locale: &str, target_locale: &str, source_url: &str) -> String {
    match primary_subtag(target_locale).as_str() {
        "zh" => format!(
            "> [!NOTE]\n> 本文由 AI 从{}原文机器翻译而来，可能存在不准确之处。请以[原文]({})为准。\n",
            chinese_name(source_locale),
            source_url
        ),
        "ja" => format!(
            "> [!NOTE]\n> この記事は{}の原文から AI によって機械翻訳されたものです。不正確な箇所がある可能性があります。正確な内容は[原文]({})をご確認ください。\n",
            japanese_name(source_locale),
            source_url
        ),
        _ => format!(
            "> [!NOTE]\n> This article was machine-translated from {} by AI and may contain inaccuracies. Please refer to the [original article]({}) for the authoritative version.\n",
            language_name(source_locale).unwrap_or(source_locale),
            source_url
        ),
    }
}

/// `disclaimer` followed by a blank line and the body
pub fn with_disclaimer(notice: &str, body: &str) -> String {
    format!("{}\n{}", notice, body.trim_start_matches(['\r', '\n']))
}

fn chinese_name(locale: &str) -> &str {
    match primary_subtag(locale).as_str() {
        "en" => "英文",
        "zh" => "中文",
        "ja" => "日文",
        "ko" => "韩文",
        "fr" => "法文",
        "de" => "德文",
        "es" => "西班牙文",
        _ => locale,
    }
}

fn japanese_name(locale: &str) -> &str {
    match primary_subtag(locale).as_str() {
        "en" => "英語",
        "zh" => "中国語",
        "ja" => "日本語",
        "ko" => "韓国語",
        "fr" => "フランス語",
        "de" => "ドイツ語",
        "es" => "スペイン語",
        _ => locale,
    }
}
