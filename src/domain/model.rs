use crate::utils::error::{FieldError, PortfolioError};
use crate::utils::validation::{check_email, check_length};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NAME_LENGTH: (usize, usize) = (2, 100);
pub const SUBJECT_LENGTH: (usize, usize) = (5, 200);
pub const MESSAGE_LENGTH: (usize, usize) = (10, 2000);

/// 前端送來的原始表單。每個欄位都可能缺少，缺少本身就是驗證錯誤。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactFormInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 通過驗證的聯絡表單，只能經由 `TryFrom<ContactFormInput>` 建立
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ContactForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<ContactFormInput> for ContactForm {
    type Error = PortfolioError;

    fn try_from(input: ContactFormInput) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let name = required("name", input.name, &mut errors, |v| {
            check_length("name", v, NAME_LENGTH.0, NAME_LENGTH.1)
        });
        let email = required("email", input.email, &mut errors, |v| check_email("email", v));
        let subject = required("subject", input.subject, &mut errors, |v| {
            check_length("subject", v, SUBJECT_LENGTH.0, SUBJECT_LENGTH.1)
        });
        let message = required("message", input.message, &mut errors, |v| {
            check_length("message", v, MESSAGE_LENGTH.0, MESSAGE_LENGTH.1)
        });

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    subject,
                    message,
                })
            }
            _ => Err(PortfolioError::validation(errors)),
        }
    }
}

fn required<F>(
    field: &str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
    check: F,
) -> Option<String>
where
    F: FnOnce(&str) -> Option<FieldError>,
{
    match value {
        None => {
            errors.push(FieldError::missing(field));
            None
        }
        Some(v) => match check(&v) {
            Some(err) => {
                errors.push(err);
                None
            }
            None => Some(v),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: SubmissionStatus,
}

impl ContactSubmission {
    pub fn from_form(form: ContactForm, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            timestamp,
            status: SubmissionStatus::New,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCheckInput {
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusCheck {
    pub fn new(client_name: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name,
            timestamp,
        }
    }
}

impl TryFrom<StatusCheckInput> for StatusCheck {
    type Error = PortfolioError;

    fn try_from(input: StatusCheckInput) -> Result<Self, Self::Error> {
        match input.client_name {
            Some(client_name) => Ok(Self::new(client_name, Utc::now())),
            None => Err(PortfolioError::validation(vec![FieldError::missing(
                "client_name",
            )])),
        }
    }
}

/// `{success: true, data: ...}` 回應外殼
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
