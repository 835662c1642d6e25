//! User profile, per-user preferences and the supported currency table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interface language, also used for AI responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Self::En),
            "ar" | "arabic" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Name used when instructing the insight model
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "Arabic (العربية)",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ar => write!(f, "ar"),
        }
    }
}

/// A display currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
}

/// Supported display currencies; the first is the default
pub const CURRENCIES: [Currency; 11] = [
    Currency { code: "SAR", symbol: "﷼", label: "Saudi Riyal" },
    Currency { code: "AED", symbol: "د.إ", label: "UAE Dirham" },
    Currency { code: "USD", symbol: "$", label: "US Dollar" },
    Currency { code: "EUR", symbol: "€", label: "Euro" },
    Currency { code: "GBP", symbol: "£", label: "British Pound" },
    Currency { code: "QAR", symbol: "ر.ق", label: "Qatari Riyal" },
    Currency { code: "KWD", symbol: "د.ك", label: "Kuwaiti Dinar" },
    Currency { code: "BHD", symbol: "د.ب", label: "Bahraini Dinar" },
    Currency { code: "OMR", symbol: "ر.ع.", label: "Omani Rial" },
    Currency { code: "EGP", symbol: "E£", label: "Egyptian Pound" },
    Currency { code: "JOD", symbol: "JD", label: "Jordanian Dinar" },
];

impl Currency {
    /// Look up a currency by ISO code (case-insensitive)
    pub fn by_code(code: &str) -> Option<Currency> {
        let code = code.trim().to_uppercase();
        CURRENCIES.iter().copied().find(|c| c.code == code)
    }

    pub fn default_currency() -> Currency {
        CURRENCIES[0]
    }
}

/// Profile document of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,

    /// Display name; empty until filled in
    #[serde(default)]
    pub name: String,

    pub created_at: DateTime<Utc>,

    pub last_login: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// New profile with the name derived from the e-mail address
    pub fn new(email: &str) -> Self {
        let now = Utc::now();
        Self {
            email: email.trim().to_string(),
            name: default_name(email),
            created_at: now,
            last_login: now,
            updated_at: None,
        }
    }
}

/// Display name derived from an e-mail: its local part, or "User"
pub fn default_name(email: &str) -> String {
    email
        .trim()
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "User".to_string())
}

/// Per-user preferences document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency_code() -> String {
    Currency::default_currency().code.to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            currency_code: default_currency_code(),
            updated_at: None,
        }
    }
}

impl UserSettings {
    /// Resolved display currency, falling back to the default for unknown codes
    pub fn currency(&self) -> Currency {
        Currency::by_code(&self.currency_code).unwrap_or_else(Currency::default_currency)
    }
}

/// Partial update of the preferences document (merge semantics)
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub language: Option<Language>,
    pub currency_code: Option<String>,
}

/// Partial update of the profile document (merge semantics)
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        assert_eq!(default_name("sara@example.com"), "sara");
        assert_eq!(default_name(""), "User");
        assert_eq!(default_name("@example.com"), "User");
    }

    #[test]
    fn test_currency_lookup() {
        assert_eq!(Currency::by_code("usd").unwrap().symbol, "$");
        assert!(Currency::by_code("XYZ").is_none());
        assert_eq!(Currency::default_currency().code, "SAR");
    }

    #[test]
    fn test_settings_fall_back_to_default_currency() {
        let settings = UserSettings {
            currency_code: "ZZZ".into(),
            ..UserSettings::default()
        };
        assert_eq!(settings.currency().code, "SAR");
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.currency_code, "SAR");

        let settings: UserSettings =
            serde_json::from_str(r#"{"language":"ar","currencyCode":"EUR"}"#).unwrap();
        assert_eq!(settings.language, Language::Ar);
        assert_eq!(settings.currency().symbol, "€");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("AR"), Some(Language::Ar));
        assert_eq!(Language::parse("english"), Some(Language::En));
        assert_eq!(Language::parse("fr"), None);
    }
}
