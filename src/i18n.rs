//! Output language selection.
//!
//! Every user-facing string table in the crate is keyed by [`Language`].
//! Both variants must be present in each table; unknown language tags fall
//! back to Chinese.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    /// Resolve a language tag such as `zh`, `en`, `en-US` or `zh_CN`.
    ///
    /// Anything unrecognized resolves to [`Language::Zh`].
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Language::En,
            "zh" => Language::Zh,
            other => {
                tracing::debug!(tag = other, "unsupported language tag, using zh");
                Language::Zh
            }
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Pick between a Chinese and an English literal.
    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Zh => zh,
            Language::En => en,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::from_tag(s))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Language::from_tag(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(Language::from_tag("en"), Language::En);
        assert_eq!(Language::from_tag("EN-us"), Language::En);
        assert_eq!(Language::from_tag("zh_CN"), Language::Zh);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_zh() {
        assert_eq!(Language::from_tag("fr"), Language::Zh);
        assert_eq!(Language::from_tag(""), Language::Zh);
        assert_eq!(Language::default(), Language::Zh);
    }

    #[test]
    fn test_pick() {
        assert_eq!(Language::En.pick("是", "yes"), "yes");
        assert_eq!(Language::Zh.pick("是", "yes"), "是");
    }
}
