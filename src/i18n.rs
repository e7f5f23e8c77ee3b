//! Internationalization (i18n) module for PhotoBench.
//!
//! Uses a simple key→string HashMap loaded at runtime from embedded translation data.
//! The `t!("key")` macro looks up the current language, falling back to English.

use std::collections::HashMap;
use std::sync::Mutex;

/// Global translation state.
static I18N: Mutex<Option<I18nState>> = Mutex::new(None);

struct I18nState {
    current_lang: String,
    /// lang_code → (key → translated_string)
    translations: HashMap<String, HashMap<String, String>>,
}

/// Supported languages: (code, native_name)
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("ru", "Русский")];

/// Initialize the i18n system with embedded translations.
/// Call once at startup; calling again resets the language to English.
pub fn init() {
    let mut translations: HashMap<String, HashMap<String, String>> = HashMap::new();

    translations.insert(
        "en".to_string(),
        parse_translations(include_str!("../locales/en.txt")),
    );
    translations.insert(
        "ru".to_string(),
        parse_translations(include_str!("../locales/ru.txt")),
    );

    let state = I18nState {
        current_lang: "en".to_string(),
        translations,
    };
    if let Ok(mut guard) = I18N.lock() {
        *guard = Some(state);
    }
}

/// Set the active language. If `code` is not a known language, falls back to "en".
pub fn set_language(code: &str) {
    if let Ok(mut guard) = I18N.lock()
        && let Some(ref mut state) = *guard
    {
        if state.translations.contains_key(code) {
            state.current_lang = code.to_string();
        } else {
            state.current_lang = "en".to_string();
        }
    }
}

/// Get the current language code.
pub fn current_language() -> String {
    if let Ok(guard) = I18N.lock()
        && let Some(ref state) = *guard
    {
        return state.current_lang.clone();
    }
    "en".to_string()
}

/// Look up a translation key. Returns the translated string if found,
/// or falls back to English, or returns the key itself as last resort.
pub fn translate(key: &str) -> String {
    if let Ok(guard) = I18N.lock()
        && let Some(ref state) = *guard
    {
        // Try current language
        if let Some(map) = state.translations.get(&state.current_lang)
            && let Some(val) = map.get(key)
        {
            return val.clone();
        }
        // Fallback to English
        if state.current_lang != "en"
            && let Some(map) = state.translations.get("en")
            && let Some(val) = map.get(key)
        {
            return val.clone();
        }
    }
    key.to_string()
}

/// Detect the system language from the usual locale variables.
/// Returns "en" if no match is found.
pub fn detect_system_language() -> String {
    for var in &["LC_ALL", "LC_MESSAGES", "LANG", "LANGUAGE"] {
        if let Ok(val) = std::env::var(var)
            && let Some(lang) = match_system_locale(&val)
        {
            return lang;
        }
    }
    "en".to_string()
}

/// Match a system locale string (e.g. "ru_RU.UTF-8", "en-GB") to a supported language.
pub fn match_system_locale(locale: &str) -> Option<String> {
    let normalized = locale.to_lowercase().replace('_', "-");

    // Extract language part (before any '.' or '@')
    let lang_part = normalized.split('.').next().unwrap_or(&normalized);
    let lang_part = lang_part.split('@').next().unwrap_or(lang_part);
    let primary = lang_part.split('-').next().unwrap_or(lang_part);

    LANGUAGES
        .iter()
        .find(|(code, _)| *code == primary)
        .map(|(code, _)| code.to_string())
}

/// Parse a simple key=value translation file.
/// Format: one `key=value` per line. Lines starting with `#` are comments.
/// A literal `\n` in a value becomes a line break.
fn parse_translations(data: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            map.insert(key.trim().to_string(), val.trim().replace("\\n", "\n"));
        }
    }
    map
}

/// Translation macro. Usage: `t!("menu.file")` or `t!("status.blur", k = 3)`
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::translate($key)
    };
    ($key:expr, $($name:ident = $val:expr),+ $(,)?) => {{
        let mut s = $crate::i18n::translate($key);
        $(
            s = s.replace(concat!("{", stringify!($name), "}"), &format!("{}", $val));
        )+
        s
    }};
}
