//! Complaint DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::complaints::{
    ComplaintAnalytics, ComplaintDetails, ComplaintQuery, MonthlyCount, NoteDetails, Overview,
};
use crate::domain::complaint::{Complaint, ComplaintCategory, ComplaintPriority};
use crate::domain::user::UserSummary;
use crate::interfaces::http::common::filter_value;
use crate::shared::DomainResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// technical, billing, service or general (default)
    pub category: Option<String>,
    /// low, medium (default), high or urgent
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignComplaintRequest {
    #[validate(length(min = 1, message = "Technician is required"))]
    pub technician_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// open, in-progress, resolved or closed
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// Replaces the stored remarks when present
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 2000, message = "Note content is required"))]
    pub content: String,
}

/// Listing filters; "all" or an empty value means no filter
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ComplaintListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ComplaintListParams {
    pub fn query(&self) -> DomainResult<ComplaintQuery> {
        Ok(ComplaintQuery {
            status: filter_value(&self.status).map(str::parse).transpose()?,
            priority: filter_value(&self.priority).map(str::parse).transpose()?,
            category: filter_value(&self.category).map(str::parse).transpose()?,
        })
    }
}

/// Parse an optional enum field of a request body
pub fn parse_optional<T>(raw: Option<&str>) -> DomainResult<Option<T>>
where
    T: std::str::FromStr<Err = crate::shared::DomainError>,
{
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplaintDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub customer_id: String,
    pub assigned_to: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub customer: Option<UserSummaryDto>,
    pub technician: Option<UserSummaryDto>,
}

impl From<Complaint> for ComplaintDto {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            category: c.category.to_string(),
            priority: c.priority.to_string(),
            status: c.status.to_string(),
            customer_id: c.customer_id,
            assigned_to: c.assigned_to,
            remarks: c.remarks,
            created_at: c.created_at,
            updated_at: c.updated_at,
            resolved_at: c.resolved_at,
            customer: None,
            technician: None,
        }
    }
}

impl From<ComplaintDetails> for ComplaintDto {
    fn from(d: ComplaintDetails) -> Self {
        Self {
            customer: d.customer.map(UserSummaryDto::from),
            technician: d.technician.map(UserSummaryDto::from),
            ..Self::from(d.complaint)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteDto {
    pub id: String,
    pub complaint_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<UserSummaryDto>,
}

impl From<NoteDetails> for NoteDto {
    fn from(d: NoteDetails) -> Self {
        Self {
            id: d.note.id,
            complaint_id: d.note.complaint_id,
            author_id: d.note.author_id,
            content: d.note.content,
            created_at: d.note.created_at,
            author: d.author.map(UserSummaryDto::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverviewDto {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
    pub urgent: u64,
}

impl From<Overview> for OverviewDto {
    fn from(o: Overview) -> Self {
        Self {
            total: o.total,
            open: o.open,
            in_progress: o.in_progress,
            resolved: o.resolved,
            closed: o.closed,
            urgent: o.urgent,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriorityCount {
    pub priority: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlyCountDto {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub count: u64,
}

impl From<MonthlyCount> for MonthlyCountDto {
    fn from(m: MonthlyCount) -> Self {
        Self {
            year: m.year,
            month: m.month,
            count: m.count,
        }
    }
}

/// Admin dashboard figures
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsDto {
    pub overview: OverviewDto,
    pub by_category: Vec<CategoryCount>,
    pub by_priority: Vec<PriorityCount>,
    /// Trailing twelve months, oldest first
    pub monthly_trend: Vec<MonthlyCountDto>,
}

impl From<ComplaintAnalytics> for AnalyticsDto {
    fn from(a: ComplaintAnalytics) -> Self {
        Self {
            overview: a.overview.into(),
            by_category: a
                .by_category
                .into_iter()
                .map(|(category, count): (ComplaintCategory, u64)| CategoryCount {
                    category: category.to_string(),
                    count,
                })
                .collect(),
            by_priority: a
                .by_priority
                .into_iter()
                .map(|(priority, count): (ComplaintPriority, u64)| PriorityCount {
                    priority: priority.to_string(),
                    count,
                })
                .collect(),
            monthly_trend: a.monthly_trend.into_iter().map(Into::into).collect(),
        }
    }
}
