use crate::domain::portfolio::Portfolio;
use crate::utils::error::{PortfolioError, Result};
use std::path::Path;
use std::sync::Arc;

/// 編譯時內嵌的作品集內容
pub const EMBEDDED_PORTFOLIO: &str = include_str!("../../data/portfolio.toml");

/// 提供唯讀的作品集文件。
///
/// 解析在建構時只做一次；若內容有誤，錯誤會保留下來並在每次 `get_portfolio`
/// 時以 `DataError` 回報，伺服器其他端點仍可正常運作。
#[derive(Debug, Clone)]
pub struct PortfolioProvider {
    document: std::result::Result<Arc<Portfolio>, String>,
}

impl PortfolioProvider {
    pub fn embedded() -> Self {
        Self::from_toml_str(EMBEDDED_PORTFOLIO)
    }

    /// 從磁碟載入；檔案讀不到屬於啟動設定錯誤，直接回傳
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("Loaded portfolio document from {}", path.as_ref().display());
        Ok(Self::from_toml_str(&content))
    }

    pub fn from_toml_str(content: &str) -> Self {
        let document = parse_portfolio(content).map(Arc::new).map_err(|e| {
            tracing::error!("❌ Portfolio document is malformed: {}", e);
            e.to_string()
        });
        Self { document }
    }

    pub fn get_portfolio(&self) -> Result<Arc<Portfolio>> {
        match &self.document {
            Ok(portfolio) => Ok(Arc::clone(portfolio)),
            Err(message) => Err(PortfolioError::DataError {
                message: message.clone(),
            }),
        }
    }
}

fn parse_portfolio(content: &str) -> Result<Portfolio> {
    let portfolio: Portfolio = toml::from_str(content).map_err(|e| PortfolioError::DataError {
        message: format!("TOML parsing error: {}", e),
    })?;

    let personal = &portfolio.personal;
    for (field, value) in [
        ("personal.name", &personal.name),
        ("personal.title", &personal.title),
        ("personal.email", &personal.email),
        ("personal.bio", &personal.bio),
    ] {
        if value.trim().is_empty() {
            return Err(PortfolioError::DataError {
                message: format!("{} cannot be empty", field),
            });
        }
    }

    Ok(portfolio)
}
