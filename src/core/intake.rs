use crate::domain::model::{ContactForm, ContactFormInput, ContactResponse, ContactSubmission};
use crate::domain::ports::{Delivery, Notifier, SubmissionStore};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const CONFIRMATION_MESSAGE: &str =
    "Thank you for your message! I'll get back to you soon.";

/// 通知結果。失敗只記錄在log，不會影響回應。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Skipped,
    Failed(String),
}

/// 成功寫入後的收據；`notification` 在背景執行，呼叫端可以等待或直接丟棄
#[derive(Debug)]
pub struct Receipt {
    pub submission: ContactSubmission,
    pub notification: JoinHandle<NotificationOutcome>,
}

impl Receipt {
    pub fn response(&self) -> ContactResponse {
        ContactResponse {
            success: true,
            message: CONFIRMATION_MESSAGE.to_string(),
        }
    }
}

/// 聯絡表單處理流程: validate → persist → notify (best-effort)
pub struct ContactIntake<S: SubmissionStore> {
    store: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: SubmissionStore> ContactIntake<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn submit(&self, input: ContactFormInput) -> Result<Receipt> {
        // Validate
        let form = ContactForm::try_from(input).inspect_err(|e| {
            tracing::debug!("Rejected contact submission: {}", e);
        })?;

        // Persist
        let submission = ContactSubmission::from_form(form, Utc::now());
        self.store.append(&submission).await.inspect_err(|e| {
            tracing::error!("❌ Failed to store contact submission: {}", e);
        })?;
        tracing::info!(
            id = %submission.id,
            "📥 Stored contact submission from {}",
            submission.email
        );

        // Notify：背景執行，失敗已在 relay 內轉成 NotificationOutcome::Failed
        let notifier = Arc::clone(&self.notifier);
        let pending = submission.clone();
        let notification = tokio::spawn(async move { relay(notifier.as_ref(), &pending).await });

        Ok(Receipt {
            submission,
            notification,
        })
    }

    pub async fn list(&self) -> Result<Vec<ContactSubmission>> {
        self.store.list_all().await
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

async fn relay(notifier: &dyn Notifier, submission: &ContactSubmission) -> NotificationOutcome {
    match notifier.notify(submission).await {
        Ok(Delivery::Sent) => {
            tracing::info!(id = %submission.id, "📧 Contact notification sent");
            NotificationOutcome::Delivered
        }
        Ok(Delivery::Skipped) => {
            tracing::debug!(id = %submission.id, "SMTP not configured, notification skipped");
            NotificationOutcome::Skipped
        }
        Err(e) => {
            tracing::warn!(id = %submission.id, "⚠️ Contact notification failed: {}", e);
            NotificationOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PortfolioError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStore {
        records: Arc<Mutex<Vec<ContactSubmission>>>,
        unavailable: bool,
    }

    impl MockStore {
        fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        async fn count(&self) -> usize {
            self.records.lock().await.len()
        }
    }

    impl SubmissionStore for MockStore {
        async fn append(&self, submission: &ContactSubmission) -> Result<()> {
            if self.unavailable {
                return Err(PortfolioError::storage("connection refused"));
            }
            self.records.lock().await.push(submission.clone());
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<ContactSubmission>> {
            let mut records = self.records.lock().await.clone();
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(records)
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        calls: AtomicUsize,
        fail: bool,
        skip: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _submission: &ContactSubmission) -> Result<Delivery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PortfolioError::notification("535 authentication failed"))
            } else if self.skip {
                Ok(Delivery::Skipped)
            } else {
                Ok(Delivery::Sent)
            }
        }
    }

    fn alex() -> ContactFormInput {
        ContactFormInput {
            name: Some("Alex Johnson".to_string()),
            email: Some("alex@x.com".to_string()),
            subject: Some("Collaboration Opportunity".to_string()),
            message: Some(
                "I would like to discuss a project with you regarding multiplayer networking."
                    .to_string(),
            ),
        }
    }

    #[tokio::test]
    async fn test_valid_submission_is_stored_and_notified() {
        let store = MockStore::default();
        let notifier = Arc::new(CountingNotifier::default());
        let intake = ContactIntake::new(store.clone(), notifier.clone());

        let receipt = intake.submit(alex()).await.unwrap();
        let response = receipt.response();
        assert!(response.success);
        assert!(!response.message.is_empty());

        assert_eq!(receipt.notification.await.unwrap(), NotificationOutcome::Delivered);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);

        let stored = intake.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, receipt.submission.id);
        assert_eq!(stored[0].email, "alex@x.com");
    }

    #[tokio::test]
    async fn test_invalid_submission_stores_nothing() {
        let store = MockStore::default();
        let notifier = Arc::new(CountingNotifier::default());
        let intake = ContactIntake::new(store.clone(), notifier.clone());

        let mut input = alex();
        input.message = Some("Short".to_string());
        let err = intake.submit(input).await.unwrap_err();

        assert!(matches!(err, PortfolioError::ValidationError { .. }));
        assert_eq!(store.count().await, 0);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates_without_notifying() {
        let notifier = Arc::new(CountingNotifier::default());
        let intake = ContactIntake::new(MockStore::unavailable(), notifier.clone());

        let err = intake.submit(alex()).await.unwrap_err();

        assert!(matches!(err, PortfolioError::StorageError { .. }));
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_submission() {
        let store = MockStore::default();
        let notifier = Arc::new(CountingNotifier {
            fail: true,
            ..CountingNotifier::default()
        });
        let intake = ContactIntake::new(store.clone(), notifier);

        let receipt = intake.submit(alex()).await.unwrap();

        match receipt.notification.await.unwrap() {
            NotificationOutcome::Failed(reason) => assert!(reason.contains("535")),
            other => panic!("expected failure outcome, got {:?}", other),
        }
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_skipped_notification() {
        let notifier = Arc::new(CountingNotifier {
            skip: true,
            ..CountingNotifier::default()
        });
        let intake = ContactIntake::new(MockStore::default(), notifier);

        let receipt = intake.submit(alex()).await.unwrap();
        assert_eq!(receipt.notification.await.unwrap(), NotificationOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_duplicate_submissions_are_independent() {
        let store = MockStore::default();
        let intake = ContactIntake::new(store.clone(), Arc::new(CountingNotifier::default()));

        let first = intake.submit(alex()).await.unwrap();
        let second = intake.submit(alex()).await.unwrap();

        assert_ne!(first.submission.id, second.submission.id);
        assert_eq!(store.count().await, 2);
    }
}
