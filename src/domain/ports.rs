use crate::domain::model::{ContactSubmission, StatusCheck};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// 聯絡表單的只增 (append-only) 儲存
pub trait SubmissionStore: Send + Sync {
    fn append(&self, submission: &ContactSubmission) -> impl Future<Output = Result<()>> + Send;

    /// 依 timestamp 由新到舊
    fn list_all(&self) -> impl Future<Output = Result<Vec<ContactSubmission>>> + Send;

    /// 釋放連線；預設不需要做任何事
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// 舊版 health-check 紀錄，與聯絡表單分開存放
pub trait StatusCheckStore: Send + Sync {
    fn append_status(&self, check: &StatusCheck) -> impl Future<Output = Result<()>> + Send;

    fn list_status(&self, limit: usize)
        -> impl Future<Output = Result<Vec<StatusCheck>>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// 未設定郵件伺服器，直接略過
    Skipped,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &ContactSubmission) -> Result<Delivery>;
}
