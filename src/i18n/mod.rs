//! Internationalization (i18n) support for widget labels

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Language used when a key is missing from the current one
const FALLBACK_LANGUAGE: &str = "en";

/// Label tables shipped with the binary
const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("en", include_str!("languages/en.yml")),
    ("zh-CN", include_str!("languages/zh-CN.yml")),
];

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a handler with the built-in label tables
    pub fn new(language: &str) -> Self {
        let mut translations: HashMap<String, HashMap<String, serde_yaml::Value>> = HashMap::new();
        for (lang, content) in BUILTIN_LANGUAGES {
            match serde_yaml::from_str(content) {
                Ok(data) => {
                    translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::warn!("Failed to parse built-in language {}: {}", lang, e),
            }
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language files from a directory, overriding built-in labels
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml") | Some("json")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)?;

            // JSON is a subset of YAML, one parser covers both
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    let table = self.translations.entry(lang.to_string()).or_default();
                    for (key, value) in data {
                        match table.get_mut(&key) {
                            Some(existing) => merge_value(existing, value),
                            None => {
                                table.insert(key, value);
                            }
                        }
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key
    /// Key can be nested like "nav.all"
    pub fn get(&self, key: &str) -> String {
        let lookup = |lang: &str| {
            self.translations
                .get(lang)
                .and_then(|data| get_nested_value(data, key))
                .map(yaml_value_to_string)
        };

        lookup(&self.language)
            .or_else(|| lookup(FALLBACK_LANGUAGE))
            .unwrap_or_else(|| key.to_string())
    }

    /// Get a translation and replace `%d` with a count
    pub fn get_count(&self, key: &str, count: usize) -> String {
        self.get(key).replace("%d", &count.to_string())
    }

    /// Get a translation and replace `%s` with text
    pub fn get_with(&self, key: &str, text: &str) -> String {
        self.get(key).replace("%s", text)
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;

    for part in parts {
        match current {
            serde_yaml::Value::Mapping(map) => {
                current = map.get(serde_yaml::Value::String(part.to_string()))?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Merge `overlay` into `base`, descending into mappings
fn merge_value(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(FALLBACK_LANGUAGE)
    }
}
