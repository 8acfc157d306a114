use crate::config::SmtpSettings;
use crate::core::{ContactSubmission, Delivery, Notifier};
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);
const IMPLICIT_TLS_PORT: u16 = 465;

/// 以 SMTP 寄送新表單通知。未設定時每次呼叫都直接回傳 `Delivery::Skipped`。
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    settings: Option<SmtpSettings>,
}

impl SmtpRelay {
    pub fn new(settings: Option<SmtpSettings>) -> Self {
        match &settings {
            Some(s) => tracing::info!("📧 SMTP relay enabled via {}:{}", s.server, s.port),
            None => tracing::info!("SMTP relay not configured, notifications will be skipped"),
        }
        Self { settings }
    }

    pub fn disabled() -> Self {
        Self { settings: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }
}

/// 組出通知信。寄件人是 SMTP_FROM (預設為 SMTP 帳號)；收件人是 CONTACT_EMAIL，
/// 未設定則寄給填表人本身。
pub fn build_message(settings: &SmtpSettings, submission: &ContactSubmission) -> Result<Message> {
    let from: Mailbox = settings.sender.parse()?;
    let to: Mailbox = settings
        .recipient
        .as_deref()
        .unwrap_or(&submission.email)
        .parse()?;
    let reply_to: Mailbox = format!("{} <{}>", submission.name, submission.email)
        .parse()
        .or_else(|_| submission.email.parse())?;

    let body = format!(
        "New contact form submission\n\n\
         Name: {}\n\
         Email: {}\n\
         Subject: {}\n\
         Received: {}\n\
         Submission ID: {}\n\n\
         Message:\n{}\n",
        submission.name,
        submission.email,
        submission.subject,
        submission.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        submission.id,
        submission.message,
    );

    let message = Message::builder()
        .from(from)
        .to(to)
        .reply_to(reply_to)
        .subject(format!("New Contact Form Submission: {}", submission.subject))
        .header(ContentType::TEXT_PLAIN)
        .body(body)?;
    Ok(message)
}

fn transport(settings: &SmtpSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    // 465 走 implicit TLS，其餘 (預設 587) 走 STARTTLS
    let builder = if settings.port == IMPLICIT_TLS_PORT {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.server)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)?
    };

    Ok(builder
        .port(settings.port)
        .credentials(Credentials::new(
            settings.username.clone(),
            settings.password.clone(),
        ))
        .timeout(Some(SMTP_TIMEOUT))
        .build())
}

#[async_trait]
impl Notifier for SmtpRelay {
    async fn notify(&self, submission: &ContactSubmission) -> Result<Delivery> {
        let Some(settings) = &self.settings else {
            return Ok(Delivery::Skipped);
        };

        let message = build_message(settings, submission)?;
        let mailer = transport(settings)?;
        mailer.send(message).await?;
        Ok(Delivery::Sent)
    }
}
