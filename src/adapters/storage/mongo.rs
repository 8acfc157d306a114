use crate::core::{ContactSubmission, StatusCheck, StatusCheckStore, SubmissionStore};
use crate::domain::model::SubmissionStatus;
use crate::utils::error::{PortfolioError, Result};
use crate::utils::validation::redact_credentials;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

pub const CONTACT_COLLECTION: &str = "contact_submissions";
pub const STATUS_COLLECTION: &str = "status_checks";

/// MongoDB 實作。`Collection` 內部以 Arc 共用連線池，clone 成本很低。
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    contacts: Collection<ContactDocument>,
    status_checks: Collection<StatusDocument>,
}

// timestamp 以 BSON date 儲存，排序才會依時間而非字串
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContactDocument {
    id: String,
    name: String,
    email: String,
    subject: String,
    message: String,
    timestamp: bson::DateTime,
    status: SubmissionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusDocument {
    id: String,
    client_name: String,
    timestamp: bson::DateTime,
}

impl MongoStore {
    /// 建立連線並 ping 一次，確認資料庫可用
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        tracing::info!("Connecting to MongoDB at {}", redact_credentials(uri));

        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some("portfolio-api".to_string());
        let client = Client::with_options(options)?;

        let database = client.database(db_name);
        database.run_command(doc! { "ping": 1 }).await?;
        tracing::info!("✅ MongoDB connection ready (database: {})", db_name);

        Ok(Self {
            contacts: database.collection(CONTACT_COLLECTION),
            status_checks: database.collection(STATUS_COLLECTION),
            client,
        })
    }
}

impl SubmissionStore for MongoStore {
    async fn append(&self, submission: &ContactSubmission) -> Result<()> {
        self.contacts
            .insert_one(ContactDocument::from(submission))
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ContactSubmission>> {
        let cursor = self
            .contacts
            .find(doc! {})
            .sort(newest_first())
            .await?;
        let documents: Vec<ContactDocument> = cursor.try_collect().await?;
        documents.into_iter().map(ContactSubmission::try_from).collect()
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client closed");
    }
}

impl StatusCheckStore for MongoStore {
    async fn append_status(&self, check: &StatusCheck) -> Result<()> {
        self.status_checks
            .insert_one(StatusDocument::from(check))
            .await?;
        Ok(())
    }

    async fn list_status(&self, limit: usize) -> Result<Vec<StatusCheck>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .status_checks
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .limit(limit)
            .await?;
        let documents: Vec<StatusDocument> = cursor.try_collect().await?;
        documents.into_iter().map(StatusCheck::try_from).collect()
    }
}

// 同一毫秒內的紀錄以 _id (ObjectId，隨寫入遞增) 決定先後，重複查詢順序一致
fn newest_first() -> Document {
    doc! { "timestamp": -1, "_id": -1 }
}

fn to_bson_time(timestamp: &DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(timestamp.timestamp_millis())
}

fn from_bson_time(id: &str, timestamp: bson::DateTime) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp.timestamp_millis()).ok_or_else(|| {
        PortfolioError::storage(format!("record {} has an out-of-range timestamp", id))
    })
}

impl From<&ContactSubmission> for ContactDocument {
    fn from(s: &ContactSubmission) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            email: s.email.clone(),
            subject: s.subject.clone(),
            message: s.message.clone(),
            timestamp: to_bson_time(&s.timestamp),
            status: s.status,
        }
    }
}

impl TryFrom<ContactDocument> for ContactSubmission {
    type Error = PortfolioError;

    fn try_from(d: ContactDocument) -> Result<Self> {
        let timestamp = from_bson_time(&d.id, d.timestamp)?;
        Ok(Self {
            id: d.id,
            name: d.name,
            email: d.email,
            subject: d.subject,
            message: d.message,
            timestamp,
            status: d.status,
        })
    }
}

impl From<&StatusCheck> for StatusDocument {
    fn from(c: &StatusCheck) -> Self {
        Self {
            id: c.id.clone(),
            client_name: c.client_name.clone(),
            timestamp: to_bson_time(&c.timestamp),
        }
    }
}

impl TryFrom<StatusDocument> for StatusCheck {
    type Error = PortfolioError;

    fn try_from(d: StatusDocument) -> Result<Self> {
        let timestamp = from_bson_time(&d.id, d.timestamp)?;
        Ok(Self {
            id: d.id,
            client_name: d.client_name,
            timestamp,
        })
    }
}
