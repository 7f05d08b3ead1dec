//! Localized form labels.
//!
//! The language comes from the page query string (`?de`, `?pt-br`). Unknown
//! codes keep the English labels; there is no partial fallback.

/// Visible texts of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    /// Master password placeholder and label.
    pub master_password: &'static str,
    /// Domain placeholder and label.
    pub domain: &'static str,
    /// Generate button text.
    pub generate: &'static str,
}

impl Default for Labels {
    fn default() -> Self {
        Language::En.labels()
    }
}

/// Languages with a label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// English.
    En,
    /// Spanish.
    Es,
    /// French.
    Fr,
    /// German.
    De,
    /// Brazilian Portuguese.
    PtBr,
    /// Traditional Chinese (Hong Kong).
    ZhHk,
    /// Hungarian.
    Hu,
    /// Russian.
    Ru,
}

impl Language {
    /// Look up a language code, exactly as written (`pt-br`, not `pt-BR`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            "de" => Some(Self::De),
            "pt-br" => Some(Self::PtBr),
            "zh-hk" => Some(Self::ZhHk),
            "hu" => Some(Self::Hu),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }

    /// Read the language from a page query string. The whole query is the
    /// code, with or without the leading `?`.
    pub fn from_query(query: &str) -> Option<Self> {
        Self::from_code(query.strip_prefix('?').unwrap_or(query))
    }

    /// Label table for this language.
    pub fn labels(self) -> Labels {
        let (master_password, domain, generate) = match self {
            Self::En => ("Master password", "Domain / URL", "Generate"),
            Self::Es => ("Contraseña maestra", "Dominio / URL", "Enviar"),
            Self::Fr => ("Mot de passe principal", "Domaine / URL", "Soumettre"),
            Self::De => ("Master Passwort", "Domain / URL", "Abschicken"),
            Self::PtBr => ("Senha-mestra", "Domínio / URL", "Gerar"),
            Self::ZhHk => ("主密碼", "域名 / URL", "提交"),
            Self::Hu => ("Mesterjelszó", "Tartomány / Internetcím", "OK"),
            Self::Ru => ("Мастер-пароль", "Домена / URL", "Подтвердить"),
        };
        Labels { master_password, domain, generate }
    }
}
