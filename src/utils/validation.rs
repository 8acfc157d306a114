use crate::utils::error::{FieldError, PortfolioError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

// local@domain，domain 至少要有一個點，每段 label 不可以 '-' 開頭或結尾
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email regex is valid")
});

/// 是否為語法正確的 email 位址
pub fn is_valid_email(value: &str) -> bool {
    // RFC 5321: local part 最長 64，整體最長 254
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    local.len() <= 64 && value.len() <= 254 && EMAIL_RE.is_match(value)
}

/// 以字元數 (非位元組) 檢查長度，回傳欄位錯誤而不是立即失敗，讓表單可以一次列出全部問題
pub fn check_length(field_name: &str, value: &str, min: usize, max: usize) -> Option<FieldError> {
    let count = value.chars().count();
    if count < min {
        Some(FieldError::new(
            field_name,
            format!("String should have at least {} characters", min),
            "string_too_short",
        ))
    } else if count > max {
        Some(FieldError::new(
            field_name,
            format!("String should have at most {} characters", max),
            "string_too_long",
        ))
    } else {
        None
    }
}

pub fn check_email(field_name: &str, value: &str) -> Option<FieldError> {
    if is_valid_email(value) {
        None
    } else {
        Some(FieldError::new(
            field_name,
            "value is not a valid email address",
            "value_error",
        ))
    }
}

pub fn validate_url(field_name: &str, url_str: &str, allowed_schemes: &[&str]) -> Result<()> {
    if url_str.is_empty() {
        return Err(PortfolioError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) if allowed_schemes.contains(&url.scheme()) => Ok(()),
        Ok(url) => Err(PortfolioError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: redact_credentials(url_str),
            reason: format!(
                "Unsupported URL scheme: {}. Allowed schemes: {}",
                url.scheme(),
                allowed_schemes.join(", ")
            ),
        }),
        Err(e) => Err(PortfolioError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: redact_credentials(url_str),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 連線字串可能帶帳密，錯誤訊息中只保留 scheme 與 host
pub fn redact_credentials(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(url) if !url.username().is_empty() || url.password().is_some() => {
            format!("{}://***@{}", url.scheme(), url.host_str().unwrap_or_default())
        }
        Ok(_) => url_str.to_string(),
        Err(_) => "<unparseable>".to_string(),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PortfolioError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PortfolioError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
