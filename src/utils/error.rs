use serde::Serialize;
use thiserror::Error;

/// 單一欄位的驗證錯誤，格式與前端既有的 `{loc, msg, type}` 相容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// 整個 request body 的錯誤 (JSON 格式錯誤、型別不符)
    pub fn body(msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, "Field required", "missing")
    }

    /// 欄位名稱 (loc 的最後一段)
    pub fn field(&self) -> &str {
        self.loc.last().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Validation error: {}", summarize(.errors))]
    ValidationError { errors: Vec<FieldError> },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Notification error: {message}")]
    NotificationError { message: String },

    #[error("Portfolio data error: {message}")]
    DataError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端造成 (4xx)
    Client,
    /// 基礎設施造成 (資料庫、郵件伺服器)
    Infrastructure,
    /// 部署或設定問題
    Deployment,
}

impl PortfolioError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::ValidationError { errors }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::NotificationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Client,
            Self::StorageError { .. }
            | Self::NotificationError { .. }
            | Self::ApiError(_)
            | Self::UnexpectedStatus { .. }
            | Self::IoError(_) => ErrorCategory::Infrastructure,
            Self::DataError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Deployment,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ValidationError { .. } => "Fix the highlighted fields and resubmit".to_string(),
            Self::StorageError { .. } => {
                "Check that MongoDB is reachable at MONGO_URL and DB_NAME is correct".to_string()
            }
            Self::NotificationError { .. } => {
                "Check SMTP_SERVER, SMTP_PORT and the SMTP credentials".to_string()
            }
            Self::DataError { .. } => "Fix the portfolio TOML document and redeploy".to_string(),
            Self::MissingConfigError { field } => {
                format!("Set the {} environment variable", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of {}", field)
            }
            Self::ApiError(_) => "Check that the API server is running and reachable".to_string(),
            Self::UnexpectedStatus { status, .. } => {
                format!("The API answered with HTTP {}; inspect the server logs", status)
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field(), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<mongodb::error::Error> for PortfolioError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for PortfolioError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::notification(err.to_string())
    }
}

impl From<lettre::error::Error> for PortfolioError {
    fn from(err: lettre::error::Error) -> Self {
        Self::notification(err.to_string())
    }
}

impl From<lettre::address::AddressError> for PortfolioError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::notification(format!("invalid mailbox: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
