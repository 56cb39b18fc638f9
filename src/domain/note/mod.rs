//! Complaint notes

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::shared::DomainResult;

/// Free-text annotation attached to a complaint
#[derive(Debug, Clone)]
pub struct ComplaintNote {
    pub id: String,
    pub complaint_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ComplaintNote {
    pub fn new(
        complaint_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            complaint_id: complaint_id.into(),
            author_id: author_id.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn save(&self, note: ComplaintNote) -> DomainResult<()>;
    /// Oldest first
    async fn find_by_complaint(&self, complaint_id: &str) -> DomainResult<Vec<ComplaintNote>>;
}
