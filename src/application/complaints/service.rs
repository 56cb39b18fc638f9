//! Complaint use-cases
//!
//! Visibility, assignment and status rules live here; handlers only shape
//! requests and responses.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::application::events::{ComplaintEvent, ComplaintEventKind, SharedEventBus};
use crate::domain::complaint::{
    Complaint, ComplaintCategory, ComplaintFilter, ComplaintPriority, ComplaintScope,
    ComplaintStatus, NewComplaint,
};
use crate::domain::note::ComplaintNote;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::{Actor, UserRole, UserSummary};
use crate::shared::{DomainError, DomainResult, PageRequest, PaginatedResult};

/// A complaint with its customer and technician joined in
#[derive(Debug, Clone)]
pub struct ComplaintDetails {
    pub complaint: Complaint,
    pub customer: Option<UserSummary>,
    pub technician: Option<UserSummary>,
}

#[derive(Debug, Clone)]
pub struct NoteDetails {
    pub note: ComplaintNote,
    pub author: Option<UserSummary>,
}

/// Input for filing a complaint
#[derive(Debug, Clone)]
pub struct ComplaintDraft {
    pub title: String,
    pub description: String,
    pub category: Option<ComplaintCategory>,
    pub priority: Option<ComplaintPriority>,
}

/// Listing filters shared by the scoped and admin listings
#[derive(Debug, Clone, Default)]
pub struct ComplaintQuery {
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub category: Option<ComplaintCategory>,
}

impl ComplaintQuery {
    fn into_filter(self, scope: ComplaintScope) -> ComplaintFilter {
        ComplaintFilter {
            scope,
            status: self.status,
            priority: self.priority,
            category: self.category,
        }
    }
}

pub struct ComplaintService {
    repos: Arc<dyn RepositoryProvider>,
    events: SharedEventBus,
}

impl ComplaintService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, events: SharedEventBus) -> Self {
        Self { repos, events }
    }

    pub async fn create(&self, actor: &Actor, draft: ComplaintDraft) -> DomainResult<Complaint> {
        let title = draft.title.trim();
        let description = draft.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(DomainError::validation("Title and description are required"));
        }

        let complaint = Complaint::new(
            NewComplaint {
                title: title.to_string(),
                description: description.to_string(),
                category: draft.category.unwrap_or_default(),
                priority: draft.priority.unwrap_or_default(),
                customer_id: actor.id.clone(),
            },
            Utc::now(),
        );
        self.repos.complaints().save(complaint.clone()).await?;

        info!(
            complaint_id = %complaint.id,
            customer_id = %complaint.customer_id,
            priority = %complaint.priority,
            "Complaint created"
        );
        self.publish(ComplaintEventKind::ComplaintCreated, &complaint);
        Ok(complaint)
    }

    /// Complaints the actor is allowed to see, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        query: ComplaintQuery,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<ComplaintDetails>> {
        let filter = query.into_filter(ComplaintScope::for_actor(actor));
        let result = self.repos.complaints().find_page(filter, page).await?;
        self.with_details(result).await
    }

    /// Every complaint regardless of owner.
    pub async fn list_all(
        &self,
        query: ComplaintQuery,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<ComplaintDetails>> {
        let result = self
            .repos
            .complaints()
            .find_page(query.into_filter(ComplaintScope::All), page)
            .await?;
        self.with_details(result).await
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<ComplaintDetails> {
        let complaint = self.find_visible(actor, id).await?;
        self.details(complaint).await
    }

    /// Hand a complaint to an active technician; status becomes in-progress.
    pub async fn assign(
        &self,
        actor: &Actor,
        id: &str,
        technician_id: &str,
    ) -> DomainResult<ComplaintDetails> {
        let mut complaint = self.find(id).await?;

        let technician = self
            .repos
            .users()
            .get_user_by_id(technician_id)
            .await?
            .filter(|u| u.role == UserRole::Technician && u.is_active)
            .ok_or_else(|| DomainError::validation("Assignee must be an active technician"))?;

        complaint.assign_to(technician.id.clone(), Utc::now());
        self.repos.complaints().update(complaint.clone()).await?;

        info!(
            complaint_id = %complaint.id,
            technician_id = %technician.id,
            actor = %actor.id,
            "Complaint assigned"
        );
        self.publish(ComplaintEventKind::ComplaintAssigned, &complaint);
        self.details(complaint).await
    }

    /// Technicians may only touch complaints assigned to them; admins any.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        status: ComplaintStatus,
        remarks: Option<String>,
    ) -> DomainResult<ComplaintDetails> {
        let mut complaint = self.find_visible(actor, id).await?;
        let previous = complaint.status;

        let remarks = remarks.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        complaint.change_status(status, remarks, Utc::now());
        self.repos.complaints().update(complaint.clone()).await?;

        info!(
            complaint_id = %complaint.id,
            from = %previous,
            to = %complaint.status,
            actor = %actor.id,
            "Complaint status updated"
        );
        self.publish(ComplaintEventKind::ComplaintStatusChanged, &complaint);
        self.details(complaint).await
    }

    pub async fn add_note(&self, actor: &Actor, id: &str, content: &str) -> DomainResult<NoteDetails> {
        let complaint = self.find_visible(actor, id).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("Note content is required"));
        }

        let note = ComplaintNote::new(complaint.id.clone(), actor.id.clone(), content);
        self.repos.notes().save(note.clone()).await?;

        info!(complaint_id = %complaint.id, note_id = %note.id, "Note added");
        self.publish(ComplaintEventKind::NoteAdded, &complaint);

        let mut authors = self.summaries([note.author_id.clone()]).await?;
        Ok(NoteDetails {
            author: authors.remove(&note.author_id),
            note,
        })
    }

    /// Notes on a visible complaint, oldest first.
    pub async fn list_notes(&self, actor: &Actor, id: &str) -> DomainResult<Vec<NoteDetails>> {
        let complaint = self.find_visible(actor, id).await?;
        let notes = self.repos.notes().find_by_complaint(&complaint.id).await?;

        let authors = self
            .summaries(notes.iter().map(|n| n.author_id.clone()))
            .await?;
        Ok(notes
            .into_iter()
            .map(|note| NoteDetails {
                author: authors.get(&note.author_id).cloned(),
                note,
            })
            .collect())
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn find(&self, id: &str) -> DomainResult<Complaint> {
        self.repos
            .complaints()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", "id", id))
    }

    /// Out-of-scope complaints are reported as missing, not forbidden.
    async fn find_visible(&self, actor: &Actor, id: &str) -> DomainResult<Complaint> {
        let complaint = self.find(id).await?;
        if !complaint.is_visible_to(actor) {
            return Err(DomainError::not_found("Complaint", "id", id));
        }
        Ok(complaint)
    }

    fn publish(&self, kind: ComplaintEventKind, complaint: &Complaint) {
        metrics::counter!("complaint_events_total", "type" => kind.as_str()).increment(1);
        self.events
            .publish(ComplaintEvent::from_complaint(kind, complaint));
    }

    async fn summaries(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> DomainResult<HashMap<String, UserSummary>> {
        let mut ids: Vec<String> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();

        let users = self.repos.users().get_users_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u.summary())).collect())
    }

    async fn details(&self, complaint: Complaint) -> DomainResult<ComplaintDetails> {
        let mut result = self.join(vec![complaint]).await?;
        result
            .pop()
            .ok_or_else(|| DomainError::Internal("complaint lost while joining users".into()))
    }

    async fn with_details(
        &self,
        page: PaginatedResult<Complaint>,
    ) -> DomainResult<PaginatedResult<ComplaintDetails>> {
        let PaginatedResult {
            items,
            total,
            page,
            limit,
            total_pages,
        } = page;
        let items = self.join(items).await?;
        Ok(PaginatedResult {
            items,
            total,
            page,
            limit,
            total_pages,
        })
    }

    async fn join(&self, complaints: Vec<Complaint>) -> DomainResult<Vec<ComplaintDetails>> {
        let ids = complaints.iter().flat_map(|c| {
            std::iter::once(c.customer_id.clone()).chain(c.assigned_to.clone())
        });
        let users = self.summaries(ids.collect::<Vec<_>>()).await?;

        Ok(complaints
            .into_iter()
            .map(|complaint| ComplaintDetails {
                customer: users.get(&complaint.customer_id).cloned(),
                technician: complaint
                    .assigned_to
                    .as_ref()
                    .and_then(|id| users.get(id).cloned()),
                complaint,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::create_event_bus;
    use crate::domain::user::{CreateUserDto, User};
    use crate::test_support::test_repositories;

    struct Fixture {
        svc: ComplaintService,
        repos: Arc<dyn RepositoryProvider>,
        events: SharedEventBus,
        admin: Actor,
        alice: Actor,
        bob: Actor,
        tech: Actor,
        other_tech: Actor,
    }

    async fn user(repos: &Arc<dyn RepositoryProvider>, name: &str, role: UserRole) -> User {
        repos
            .users()
            .create_user(CreateUserDto {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "hash".into(),
                role,
            })
            .await
            .unwrap()
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = test_repositories().await;
        let events = create_event_bus();
        Fixture {
            svc: ComplaintService::new(repos.clone(), events.clone()),
            admin: user(&repos, "Admin", UserRole::Admin).await.actor(),
            alice: user(&repos, "Alice", UserRole::Customer).await.actor(),
            bob: user(&repos, "Bob", UserRole::Customer).await.actor(),
            tech: user(&repos, "Tess", UserRole::Technician).await.actor(),
            other_tech: user(&repos, "Theo", UserRole::Technician).await.actor(),
            repos,
            events,
        }
    }

    fn draft(title: &str) -> ComplaintDraft {
        ComplaintDraft {
            title: title.into(),
            description: "Kitchen sink leaking for 2 days".into(),
            category: Some(ComplaintCategory::Technical),
            priority: Some(ComplaintPriority::High),
        }
    }

    fn page() -> PageRequest {
        PageRequest::new(None, None, 10)
    }

    #[tokio::test]
    async fn create_defaults_and_ownership() {
        let f = fixture().await;
        let c = f
            .svc
            .create(
                &f.alice,
                ComplaintDraft {
                    title: "  Noise  ".into(),
                    description: "Loud fan".into(),
                    category: None,
                    priority: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(c.title, "Noise");
        assert_eq!(c.status, ComplaintStatus::Open);
        assert_eq!(c.category, ComplaintCategory::General);
        assert_eq!(c.priority, ComplaintPriority::Medium);
        assert_eq!(c.customer_id, f.alice.id);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let f = fixture().await;
        let err = f.svc.create(&f.alice, draft("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn listings_are_scoped_by_role() {
        let f = fixture().await;
        let a1 = f.svc.create(&f.alice, draft("a1")).await.unwrap();
        f.svc.create(&f.alice, draft("a2")).await.unwrap();
        f.svc.create(&f.bob, draft("b1")).await.unwrap();
        f.svc.assign(&f.admin, &a1.id, &f.tech.id).await.unwrap();

        let alice = f.svc.list(&f.alice, ComplaintQuery::default(), page()).await.unwrap();
        assert_eq!(alice.total, 2);
        assert!(alice.items.iter().all(|d| d.complaint.customer_id == f.alice.id));

        let tech = f.svc.list(&f.tech, ComplaintQuery::default(), page()).await.unwrap();
        assert_eq!(tech.total, 1);
        assert!(tech
            .items
            .iter()
            .all(|d| d.complaint.assigned_to.as_deref() == Some(f.tech.id.as_str())));

        let other = f
            .svc
            .list(&f.other_tech, ComplaintQuery::default(), page())
            .await
            .unwrap();
        assert_eq!(other.total, 0);

        let admin = f.svc.list(&f.admin, ComplaintQuery::default(), page()).await.unwrap();
        assert_eq!(admin.total, 3);
    }

    #[tokio::test]
    async fn list_all_joins_customer_and_technician() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("joined")).await.unwrap();
        f.svc.assign(&f.admin, &c.id, &f.tech.id).await.unwrap();

        let all = f.svc.list_all(ComplaintQuery::default(), page()).await.unwrap();
        let details = &all.items[0];
        assert_eq!(details.customer.as_ref().unwrap().name, "Alice");
        assert_eq!(details.technician.as_ref().unwrap().name, "Tess");
    }

    #[tokio::test]
    async fn filters_narrow_the_listing() {
        let f = fixture().await;
        f.svc.create(&f.alice, draft("high")).await.unwrap();
        let mut low = draft("low");
        low.priority = Some(ComplaintPriority::Low);
        f.svc.create(&f.alice, low).await.unwrap();

        let query = ComplaintQuery {
            priority: Some(ComplaintPriority::Low),
            ..Default::default()
        };
        let result = f.svc.list(&f.alice, query, page()).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].complaint.title, "low");
    }

    #[tokio::test]
    async fn assignment_forces_in_progress_and_clears_resolution() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("reopen")).await.unwrap();
        f.svc
            .update_status(&f.admin, &c.id, ComplaintStatus::Closed, None)
            .await
            .unwrap();

        let assigned = f.svc.assign(&f.admin, &c.id, &f.tech.id).await.unwrap();
        assert_eq!(assigned.complaint.status, ComplaintStatus::InProgress);
        assert!(assigned.complaint.resolved_at.is_none());
    }

    #[tokio::test]
    async fn assignee_must_be_an_active_technician() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("x")).await.unwrap();

        for assignee in [f.bob.id.clone(), "missing".to_string()] {
            let err = f.svc.assign(&f.admin, &c.id, &assignee).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }

        f.repos.users().set_active(&f.tech.id, false).await.unwrap();
        let err = f.svc.assign(&f.admin, &c.id, &f.tech.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn assigning_unknown_complaint_is_not_found() {
        let f = fixture().await;
        let err = f.svc.assign(&f.admin, "missing", &f.tech.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn status_updates_keep_resolved_at_consistent() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("s")).await.unwrap();
        f.svc.assign(&f.admin, &c.id, &f.tech.id).await.unwrap();

        let resolved = f
            .svc
            .update_status(&f.tech, &c.id, ComplaintStatus::Resolved, Some("Replaced washer".into()))
            .await
            .unwrap();
        assert!(resolved.complaint.resolved_at.is_some());
        assert_eq!(resolved.complaint.remarks.as_deref(), Some("Replaced washer"));

        let reopened = f
            .svc
            .update_status(&f.admin, &c.id, ComplaintStatus::Open, None)
            .await
            .unwrap();
        assert!(reopened.complaint.resolved_at.is_none());
        assert_eq!(reopened.complaint.remarks.as_deref(), Some("Replaced washer"));
    }

    #[tokio::test]
    async fn technician_cannot_update_someone_elses_complaint() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("s")).await.unwrap();
        f.svc.assign(&f.admin, &c.id, &f.tech.id).await.unwrap();

        let err = f
            .svc
            .update_status(&f.other_tech, &c.id, ComplaintStatus::Resolved, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_hides_other_customers_complaints() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("private")).await.unwrap();
        assert!(f.svc.get(&f.alice, &c.id).await.is_ok());
        assert!(matches!(
            f.svc.get(&f.bob, &c.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn notes_are_listed_oldest_first_with_authors() {
        let f = fixture().await;
        let c = f.svc.create(&f.alice, draft("n")).await.unwrap();
        f.svc.add_note(&f.alice, &c.id, "first").await.unwrap();
        f.svc.add_note(&f.admin, &c.id, "second").await.unwrap();

        let notes = f.svc.list_notes(&f.alice, &c.id).await.unwrap();
        let contents: Vec<_> = notes.iter().map(|n| n.note.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(notes[1].author.as_ref().unwrap().name, "Admin");

        assert!(f.svc.list_notes(&f.bob, &c.id).await.is_err());
        assert!(matches!(
            f.svc.add_note(&f.alice, &c.id, "  ").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn mutations_publish_events() {
        let f = fixture().await;
        let mut sub = f.events.subscribe();

        let c = f.svc.create(&f.alice, draft("evt")).await.unwrap();
        f.svc.assign(&f.admin, &c.id, &f.tech.id).await.unwrap();

        let first = sub.recv().await.unwrap();
        assert_eq!(first.event.kind, ComplaintEventKind::ComplaintCreated);
        let second = sub.recv().await.unwrap();
        assert_eq!(second.event.kind, ComplaintEventKind::ComplaintAssigned);
        assert_eq!(second.event.status, "in-progress");
    }
}
