/*!
 * Message lookup for user-facing text
 *
 * Tables are flat TOML files of `key = "text"`. English is always loaded and
 * backs every other language; an unknown key renders as the key itself.
 */

use std::collections::HashMap;

use crate::error::{ChadError, Result};

const EN: &str = include_str!("locale/en.toml");
const ZH: &str = include_str!("locale/zh.toml");

#[derive(Debug, Clone, Default)]
pub struct Localization {
    primary: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Localization {
    /// Built-in table for `language`, English for anything unknown
    pub fn for_language(language: &str) -> Result<Self> {
        let fallback = parse_table(EN)?;
        let primary = match language.split(['-', '_']).next().unwrap_or_default() {
            "zh" => parse_table(ZH)?,
            "en" => HashMap::new(),
            other => {
                tracing::debug!(language = other, "no built-in messages, using English");
                HashMap::new()
            }
        };
        Ok(Self { primary, fallback })
    }

    /// Layer a custom table over English
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(Self {
            primary: parse_table(contents)?,
            fallback: parse_table(EN)?,
        })
    }

    pub fn lookup(&self, key: &str) -> String {
        self.primary
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| {
                tracing::warn!(key, "missing localization key");
                key.to_string()
            })
    }
}

fn parse_table(contents: &str) -> Result<HashMap<String, String>> {
    toml::from_str(contents).map_err(|e| ChadError::Config(format!("bad message table: {}", e)))
}
