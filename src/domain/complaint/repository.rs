//! Complaint repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Complaint, ComplaintCategory, ComplaintFilter, ComplaintPriority};
use crate::shared::{DomainResult, PageRequest, PaginatedResult};

#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn save(&self, complaint: Complaint) -> DomainResult<()>;
    async fn update(&self, complaint: Complaint) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Complaint>>;

    /// Newest first
    async fn find_page(
        &self,
        filter: ComplaintFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Complaint>>;
    async fn count(&self, filter: ComplaintFilter) -> DomainResult<u64>;

    async fn count_by_category(&self) -> DomainResult<Vec<(ComplaintCategory, u64)>>;
    async fn count_by_priority(&self) -> DomainResult<Vec<(ComplaintPriority, u64)>>;
    /// Creation timestamps at or after `since`, for trend bucketing
    async fn created_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<DateTime<Utc>>>;
}
