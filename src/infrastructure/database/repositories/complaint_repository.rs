use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use super::db_err;
use crate::domain::complaint::{
    Complaint, ComplaintCategory, ComplaintFilter, ComplaintPriority, ComplaintRepository,
    ComplaintScope, ComplaintStatus,
};
use crate::infrastructure::database::entities::complaint;
use crate::shared::{DomainResult, PageRequest, PaginatedResult};

pub struct SeaOrmComplaintRepository {
    db: DatabaseConnection,
}

impl SeaOrmComplaintRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_entity(status: ComplaintStatus) -> complaint::ComplaintStatus {
    match status {
        ComplaintStatus::Open => complaint::ComplaintStatus::Open,
        ComplaintStatus::InProgress => complaint::ComplaintStatus::InProgress,
        ComplaintStatus::Resolved => complaint::ComplaintStatus::Resolved,
        ComplaintStatus::Closed => complaint::ComplaintStatus::Closed,
    }
}

fn status_to_domain(status: complaint::ComplaintStatus) -> ComplaintStatus {
    match status {
        complaint::ComplaintStatus::Open => ComplaintStatus::Open,
        complaint::ComplaintStatus::InProgress => ComplaintStatus::InProgress,
        complaint::ComplaintStatus::Resolved => ComplaintStatus::Resolved,
        complaint::ComplaintStatus::Closed => ComplaintStatus::Closed,
    }
}

fn category_to_entity(category: ComplaintCategory) -> complaint::ComplaintCategory {
    match category {
        ComplaintCategory::Technical => complaint::ComplaintCategory::Technical,
        ComplaintCategory::Billing => complaint::ComplaintCategory::Billing,
        ComplaintCategory::Service => complaint::ComplaintCategory::Service,
        ComplaintCategory::General => complaint::ComplaintCategory::General,
    }
}

fn category_to_domain(category: complaint::ComplaintCategory) -> ComplaintCategory {
    match category {
        complaint::ComplaintCategory::Technical => ComplaintCategory::Technical,
        complaint::ComplaintCategory::Billing => ComplaintCategory::Billing,
        complaint::ComplaintCategory::Service => ComplaintCategory::Service,
        complaint::ComplaintCategory::General => ComplaintCategory::General,
    }
}

fn priority_to_entity(priority: ComplaintPriority) -> complaint::ComplaintPriority {
    match priority {
        ComplaintPriority::Low => complaint::ComplaintPriority::Low,
        ComplaintPriority::Medium => complaint::ComplaintPriority::Medium,
        ComplaintPriority::High => complaint::ComplaintPriority::High,
        ComplaintPriority::Urgent => complaint::ComplaintPriority::Urgent,
    }
}

fn priority_to_domain(priority: complaint::ComplaintPriority) -> ComplaintPriority {
    match priority {
        complaint::ComplaintPriority::Low => ComplaintPriority::Low,
        complaint::ComplaintPriority::Medium => ComplaintPriority::Medium,
        complaint::ComplaintPriority::High => ComplaintPriority::High,
        complaint::ComplaintPriority::Urgent => ComplaintPriority::Urgent,
    }
}

fn model_to_domain(model: complaint::Model) -> Complaint {
    Complaint {
        id: model.id,
        title: model.title,
        description: model.description,
        category: category_to_domain(model.category),
        priority: priority_to_domain(model.priority),
        status: status_to_domain(model.status),
        customer_id: model.customer_id,
        assigned_to: model.assigned_to,
        remarks: model.remarks,
        created_at: model.created_at,
        updated_at: model.updated_at,
        resolved_at: model.resolved_at,
    }
}

fn domain_to_active(c: Complaint) -> complaint::ActiveModel {
    complaint::ActiveModel {
        id: Set(c.id),
        title: Set(c.title),
        description: Set(c.description),
        category: Set(category_to_entity(c.category)),
        priority: Set(priority_to_entity(c.priority)),
        status: Set(status_to_entity(c.status)),
        customer_id: Set(c.customer_id),
        assigned_to: Set(c.assigned_to),
        remarks: Set(c.remarks),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
        resolved_at: Set(c.resolved_at),
    }
}

fn apply_filter(mut query: Select<complaint::Entity>, filter: &ComplaintFilter) -> Select<complaint::Entity> {
    query = match &filter.scope {
        ComplaintScope::All => query,
        ComplaintScope::CreatedBy(id) => query.filter(complaint::Column::CustomerId.eq(id.as_str())),
        ComplaintScope::AssignedTo(id) => query.filter(complaint::Column::AssignedTo.eq(id.as_str())),
    };
    if let Some(status) = filter.status {
        query = query.filter(complaint::Column::Status.eq(status_to_entity(status)));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(complaint::Column::Priority.eq(priority_to_entity(priority)));
    }
    if let Some(category) = filter.category {
        query = query.filter(complaint::Column::Category.eq(category_to_entity(category)));
    }
    query
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ComplaintRepository for SeaOrmComplaintRepository {
    async fn save(&self, complaint: Complaint) -> DomainResult<()> {
        complaint::Entity::insert(domain_to_active(complaint))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, complaint: Complaint) -> DomainResult<()> {
        domain_to_active(complaint)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Complaint>> {
        let model = complaint::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_page(
        &self,
        filter: ComplaintFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Complaint>> {
        let query = apply_filter(complaint::Entity::find(), &filter);
        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(complaint::Column::CreatedAt)
            .order_by_desc(complaint::Column::Id)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page))
    }

    async fn count(&self, filter: ComplaintFilter) -> DomainResult<u64> {
        apply_filter(complaint::Entity::find(), &filter)
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_by_category(&self) -> DomainResult<Vec<(ComplaintCategory, u64)>> {
        let rows: Vec<(complaint::ComplaintCategory, i64)> = complaint::Entity::find()
            .select_only()
            .column(complaint::Column::Category)
            .column_as(complaint::Column::Id.count(), "count")
            .group_by(complaint::Column::Category)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| (category_to_domain(category), count as u64))
            .collect())
    }

    async fn count_by_priority(&self) -> DomainResult<Vec<(ComplaintPriority, u64)>> {
        let rows: Vec<(complaint::ComplaintPriority, i64)> = complaint::Entity::find()
            .select_only()
            .column(complaint::Column::Priority)
            .column_as(complaint::Column::Id.count(), "count")
            .group_by(complaint::Column::Priority)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(priority, count)| (priority_to_domain(priority), count as u64))
            .collect())
    }

    async fn created_since(&self, since: DateTime<Utc>) -> DomainResult<Vec<DateTime<Utc>>> {
        complaint::Entity::find()
            .select_only()
            .column(complaint::Column::CreatedAt)
            .filter(complaint::Column::CreatedAt.gte(since))
            .order_by_asc(complaint::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}
