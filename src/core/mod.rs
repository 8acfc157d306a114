pub mod intake;
pub mod portfolio;

pub use crate::domain::model::{ContactSubmission, StatusCheck};
pub use crate::domain::ports::{Delivery, Notifier, StatusCheckStore, SubmissionStore};
pub use crate::utils::error::Result;
