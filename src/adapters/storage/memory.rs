use crate::core::{ContactSubmission, StatusCheck, StatusCheckStore, SubmissionStore};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 行程內的儲存實作，給 `--memory-store` 與測試使用；重啟後資料即消失
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    submissions: Arc<RwLock<Vec<ContactSubmission>>>,
    status_checks: Arc<RwLock<Vec<StatusCheck>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionStore for MemoryStore {
    async fn append(&self, submission: &ContactSubmission) -> Result<()> {
        self.submissions.write().await.push(submission.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ContactSubmission>> {
        let mut submissions = self.submissions.read().await.clone();
        // stable sort：同一時間戳保持寫入順序
        submissions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(submissions)
    }
}

impl StatusCheckStore for MemoryStore {
    async fn append_status(&self, check: &StatusCheck) -> Result<()> {
        self.status_checks.write().await.push(check.clone());
        Ok(())
    }

    async fn list_status(&self, limit: usize) -> Result<Vec<StatusCheck>> {
        let checks = self.status_checks.read().await;
        Ok(checks.iter().take(limit).cloned().collect())
    }
}
