//! 支持的语言列表

use serde::Serialize;

/// 语言描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageDescriptor {
    /// ISO 639-1 风格的语言代码，唯一
    pub code: &'static str,
    /// 英文名称
    pub display_name: &'static str,
    /// 本地名称
    pub native_name: &'static str,
}

/// 没有有效偏好时使用的语言，同时也是页面源语言
pub const DEFAULT_LANGUAGE: &str = "en";

pub const SUPPORTED_LANGUAGES: &[LanguageDescriptor] = &[
    LanguageDescriptor { code: "en", display_name: "English", native_name: "English" },
    LanguageDescriptor { code: "hi", display_name: "Hindi", native_name: "हिन्दी" },
    LanguageDescriptor { code: "ta", display_name: "Tamil", native_name: "தமிழ்" },
    LanguageDescriptor { code: "te", display_name: "Telugu", native_name: "తెలుగు" },
    LanguageDescriptor { code: "bn", display_name: "Bengali", native_name: "বাংলা" },
    LanguageDescriptor { code: "mr", display_name: "Marathi", native_name: "मराठी" },
    LanguageDescriptor { code: "gu", display_name: "Gujarati", native_name: "ગુજરાતી" },
    LanguageDescriptor { code: "kn", display_name: "Kannada", native_name: "ಕನ್ನಡ" },
    LanguageDescriptor { code: "ml", display_name: "Malayalam", native_name: "മലയാളം" },
    LanguageDescriptor { code: "pa", display_name: "Punjabi", native_name: "ਪੰਜਾਬੀ" },
];

pub fn find_language(code: &str) -> Option<&'static LanguageDescriptor> {
    SUPPORTED_LANGUAGES.iter().find(|lang| lang.code == code)
}

pub fn is_supported(code: &str) -> bool {
    find_language(code).is_some()
}

/// 显示名称，未知代码时原样返回
pub fn display_name(code: &str) -> &str {
    find_language(code).map_or(code, |lang| lang.display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        for (i, lang) in SUPPORTED_LANGUAGES.iter().enumerate() {
            assert!(
                SUPPORTED_LANGUAGES[i + 1..].iter().all(|other| other.code != lang.code),
                "duplicate code {}",
                lang.code
            );
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(SUPPORTED_LANGUAGES[0].code, DEFAULT_LANGUAGE);
        assert_eq!(find_language("ta").unwrap().display_name, "Tamil");
        assert!(!is_supported("fr"));
        assert_eq!(display_name("pa"), "Punjabi");
        assert_eq!(display_name("xx"), "xx");
    }
}
