use crate::utils::error::{PortfolioError, Result};
use crate::utils::validation::{
    is_valid_email, redact_credentials, validate_range, validate_required_field, validate_url,
    Validate,
};
use std::fmt;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_CORS_ORIGINS: &str = "*";

/// 由環境變數組成的執行設定
#[derive(Clone)]
pub struct AppConfig {
    pub mongo_url: Option<String>,
    pub db_name: Option<String>,
    pub cors_origins: Vec<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// SMTP_FROM；帳號不是 email 格式 (例如 `apikey`) 時必須設定
    pub smtp_from: Option<String>,
    pub contact_email: Option<String>,
}

/// 郵件轉發設定；只有 server、username、password 都存在時才會建立
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// 寄件人：SMTP_FROM，未設定時沿用 username
    pub sender: String,
    /// CONTACT_EMAIL；未設定時寄回給填表人
    pub recipient: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意查詢函式讀取設定，測試時不需要改動行程的環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字串視同未設定
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let smtp_port = match get("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                PortfolioError::InvalidConfigValueError {
                    field: "SMTP_PORT".to_string(),
                    value: raw.clone(),
                    reason: format!("Not a valid port number: {}", e),
                }
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            mongo_url: get("MONGO_URL"),
            db_name: get("DB_NAME"),
            cors_origins,
            smtp_server: get("SMTP_SERVER"),
            smtp_port,
            smtp_username: get("SMTP_USERNAME"),
            smtp_password: get("SMTP_PASSWORD"),
            smtp_from: get("SMTP_FROM"),
            contact_email: get("CONTACT_EMAIL"),
        })
    }

    /// MongoDB 連線所需的 (MONGO_URL, DB_NAME)
    pub fn mongo(&self) -> Result<(&str, &str)> {
        let url = validate_required_field("MONGO_URL", &self.mongo_url)?;
        let db_name = validate_required_field("DB_NAME", &self.db_name)?;
        Ok((url.as_str(), db_name.as_str()))
    }

    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        match (&self.smtp_server, &self.smtp_username, &self.smtp_password) {
            (Some(server), Some(username), Some(password)) => Some(SmtpSettings {
                server: server.clone(),
                port: self.smtp_port,
                username: username.clone(),
                password: password.clone(),
                sender: self.smtp_from.clone().unwrap_or_else(|| username.clone()),
                recipient: self.contact_email.clone(),
            }),
            _ => None,
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.mongo_url {
            validate_url("MONGO_URL", url, &["mongodb", "mongodb+srv"])?;
        }

        validate_range("SMTP_PORT", self.smtp_port, 1, u16::MAX)?;

        if let Some(email) = &self.contact_email {
            if !is_valid_email(email) {
                return Err(PortfolioError::InvalidConfigValueError {
                    field: "CONTACT_EMAIL".to_string(),
                    value: email.clone(),
                    reason: "Not a valid email address".to_string(),
                });
            }
        }

        // 寄件人會被解析成 mailbox，格式不對的話每封通知都會失敗
        if let Some(smtp) = self.smtp_settings() {
            if !is_valid_email(&smtp.sender) {
                let field = if self.smtp_from.is_some() { "SMTP_FROM" } else { "SMTP_USERNAME" };
                return Err(PortfolioError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: smtp.sender,
                    reason: "Sender must be an email address; set SMTP_FROM when the SMTP \
                             username is not one"
                        .to_string(),
                });
            }
        }

        if !self.allows_any_origin() {
            for origin in &self.cors_origins {
                validate_url("CORS_ORIGINS", origin, &["http", "https"])?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("mongo_url", &self.mongo_url.as_deref().map(redact_credentials))
            .field("db_name", &self.db_name)
            .field("cors_origins", &self.cors_origins)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "***"))
            .field("smtp_from", &self.smtp_from)
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(config.allows_any_origin());
        assert!(config.smtp_settings().is_none());
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.mongo(),
            Err(PortfolioError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_full_configuration() {
        let config = config_from(&[
            ("MONGO_URL", "mongodb://localhost:27017"),
            ("DB_NAME", "portfolio"),
            ("CORS_ORIGINS", "https://example.com, http://localhost:3000"),
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USERNAME", "mailer@example.com"),
            ("SMTP_PASSWORD", "app-password"),
            ("CONTACT_EMAIL", "owner@example.com"),
        ])
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.mongo().unwrap(), ("mongodb://localhost:27017", "portfolio"));
        assert_eq!(
            config.cors_origins,
            vec!["https://example.com", "http://localhost:3000"]
        );
        assert!(!config.allows_any_origin());

        let smtp = config.smtp_settings().unwrap();
        assert_eq!(smtp.port, 465);
        assert_eq!(smtp.recipient.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_smtp_settings_are_all_or_nothing() {
        let config = config_from(&[
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer@example.com"),
        ])
        .unwrap();
        assert!(config.smtp_settings().is_none());

        // 空字串等同未設定
        let config = config_from(&[
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer@example.com"),
            ("SMTP_PASSWORD", ""),
        ])
        .unwrap();
        assert!(config.smtp_settings().is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("SMTP_PORT", "not-a-port")]).is_err());

        let config = config_from(&[("SMTP_PORT", "0")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("MONGO_URL", "postgres://localhost")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("CONTACT_EMAIL", "nobody")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("CORS_ORIGINS", "example.com")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sender_defaults_to_username() {
        let config = config_from(&[
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer@example.com"),
            ("SMTP_PASSWORD", "app-password"),
        ])
        .unwrap();
        assert_eq!(config.smtp_settings().unwrap().sender, "mailer@example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_email_username_needs_smtp_from() {
        let pairs = [
            ("SMTP_SERVER", "smtp.sendgrid.net"),
            ("SMTP_USERNAME", "apikey"),
            ("SMTP_PASSWORD", "app-password"),
        ];

        let config = config_from(&pairs).unwrap();
        match config.validate() {
            Err(PortfolioError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "SMTP_USERNAME")
            }
            other => panic!("expected SMTP_USERNAME error, got {:?}", other),
        }

        let mut with_from = pairs.to_vec();
        with_from.push(("SMTP_FROM", "site@example.com"));
        let config = config_from(&with_from).unwrap();
        assert!(config.validate().is_ok());
        let smtp = config.smtp_settings().unwrap();
        assert_eq!(smtp.username, "apikey");
        assert_eq!(smtp.sender, "site@example.com");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = config_from(&[
            ("MONGO_URL", "mongodb://admin:hunter2@db:27017"),
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "app-password"),
        ])
        .unwrap();
        let rendered = format!("{:?} {:?}", config, config.smtp_settings().unwrap());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("app-password"));
    }
}
