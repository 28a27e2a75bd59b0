use serde::{Deserialize, Serialize};
use std::fmt;

/// 语言代码
///
/// 值对象：ISO 风格的短代码（`ja`、`en`、`fil` 等），统一为小写
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_lowercase())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LanguageCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// 语言目录条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedLanguage {
    pub code: &'static str,
    /// 本地语言名称
    pub name: &'static str,
    pub flag: &'static str,
}

const CATALOG: &[SupportedLanguage] = &[
    SupportedLanguage { code: "ja", name: "日本語", flag: "🇯🇵" },
    SupportedLanguage { code: "en", name: "English", flag: "🇺🇸" },
    SupportedLanguage { code: "vi", name: "Tiếng Việt", flag: "🇻🇳" },
    SupportedLanguage { code: "zh", name: "中文", flag: "🇨🇳" },
    SupportedLanguage { code: "fil", name: "Filipino", flag: "🇵🇭" },
    SupportedLanguage { code: "id", name: "Bahasa Indonesia", flag: "🇮🇩" },
    SupportedLanguage { code: "th", name: "ไทย", flag: "🇹🇭" },
    SupportedLanguage { code: "my", name: "မြန်မာ", flag: "🇲🇲" },
    SupportedLanguage { code: "km", name: "ខ្មែរ", flag: "🇰🇭" },
    SupportedLanguage { code: "ne", name: "नेपाली", flag: "🇳🇵" },
    SupportedLanguage { code: "mn", name: "Монгол", flag: "🇲🇳" },
];

/// 固定的支持语言目录（静态配置，不可由用户扩展）
pub struct LanguageCatalog;

impl LanguageCatalog {
    /// 按展示顺序返回全部语言
    pub fn all() -> &'static [SupportedLanguage] {
        CATALOG
    }

    pub fn find(code: &LanguageCode) -> Option<&'static SupportedLanguage> {
        CATALOG.iter().find(|lang| lang.code == code.code())
    }

    pub fn is_supported(code: &LanguageCode) -> bool {
        Self::find(code).is_some()
    }
}
