//! Demo data for local development

use tracing::info;

use crate::application::complaints::{ComplaintDraft, ComplaintService};
use crate::application::identity::UserService;
use crate::domain::complaint::{ComplaintCategory, ComplaintPriority, ComplaintStatus};
use crate::domain::user::{Actor, User, UserRole};
use crate::shared::DomainResult;

pub const DEMO_PASSWORD: &str = "password123";

struct DemoComplaint {
    title: &'static str,
    description: &'static str,
    category: ComplaintCategory,
    priority: ComplaintPriority,
    /// Index into the customer list
    customer: usize,
    /// Index into the technician list plus the status it ends up in
    handled_by: Option<(usize, ComplaintStatus)>,
    note: Option<&'static str>,
}

const COMPLAINTS: &[DemoComplaint] = &[
    DemoComplaint {
        title: "Internet Connection Issues",
        description: "My internet connection has been very slow for the past week. Pages take forever to load.",
        category: ComplaintCategory::Technical,
        priority: ComplaintPriority::High,
        customer: 0,
        handled_by: Some((0, ComplaintStatus::InProgress)),
        note: None,
    },
    DemoComplaint {
        title: "Billing Discrepancy",
        description: "I was charged twice for my monthly subscription. Please refund the duplicate charge.",
        category: ComplaintCategory::Billing,
        priority: ComplaintPriority::Medium,
        customer: 1,
        handled_by: None,
        note: None,
    },
    DemoComplaint {
        title: "Service Outage in Downtown Area",
        description: "Complete service outage in the downtown area since yesterday evening.",
        category: ComplaintCategory::Service,
        priority: ComplaintPriority::Urgent,
        customer: 0,
        handled_by: Some((1, ComplaintStatus::Resolved)),
        note: Some("Issue identified and resolved. Service restored to all affected areas."),
    },
    DemoComplaint {
        title: "Request for Service Upgrade",
        description: "I would like to upgrade my current plan to include premium features.",
        category: ComplaintCategory::General,
        priority: ComplaintPriority::Low,
        customer: 1,
        handled_by: None,
        note: None,
    },
    DemoComplaint {
        title: "Mobile App Crashes Frequently",
        description: "The mobile app crashes every time I open my account details since the latest update.",
        category: ComplaintCategory::Technical,
        priority: ComplaintPriority::Medium,
        customer: 0,
        handled_by: Some((0, ComplaintStatus::InProgress)),
        note: None,
    },
];

/// Two technicians, two customers and a handful of complaints in various
/// states. Does nothing when the demo accounts already exist.
pub async fn seed_demo_data(users: &UserService, complaints: &ComplaintService) -> DomainResult<bool> {
    if users.find_by_email("tech1@example.com").await?.is_some() {
        info!("Demo data already present");
        return Ok(false);
    }

    let mut technicians: Vec<User> = Vec::new();
    for (name, email) in [
        ("John Technician", "tech1@example.com"),
        ("Sarah Tech", "tech2@example.com"),
    ] {
        technicians.push(
            users
                .create_staff(name, email, DEMO_PASSWORD, UserRole::Technician.as_str())
                .await?,
        );
    }

    let mut customers: Vec<User> = Vec::new();
    for (name, email) in [
        ("Alice Customer", "customer1@example.com"),
        ("Bob Customer", "customer2@example.com"),
    ] {
        customers.push(users.register(name, email, DEMO_PASSWORD).await?.user);
    }

    let dispatcher = Actor::new("demo-seed", UserRole::Admin);
    for demo in COMPLAINTS {
        let complaint = complaints
            .create(
                &customers[demo.customer].actor(),
                ComplaintDraft {
                    title: demo.title.to_string(),
                    description: demo.description.to_string(),
                    category: Some(demo.category),
                    priority: Some(demo.priority),
                },
            )
            .await?;

        let Some((tech, status)) = demo.handled_by else {
            continue;
        };
        let technician = technicians[tech].actor();
        complaints
            .assign(&dispatcher, &complaint.id, &technician.id)
            .await?;
        if status != ComplaintStatus::InProgress {
            complaints
                .update_status(&technician, &complaint.id, status, None)
                .await?;
        }
        if let Some(note) = demo.note {
            complaints.add_note(&technician, &complaint.id, note).await?;
        }
    }

    info!(
        technicians = technicians.len(),
        customers = customers.len(),
        complaints = COMPLAINTS.len(),
        "Demo data created (password: {})",
        DEMO_PASSWORD
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::create_event_bus;
    use crate::application::complaints::ComplaintQuery;
    use crate::infrastructure::crypto::JwtConfig;
    use crate::shared::PageRequest;
    use crate::test_support::test_repositories;

    #[tokio::test]
    async fn seeds_once() {
        let repos = test_repositories().await;
        let users = UserService::new(repos.clone(), JwtConfig::new("s", 60), 4);
        let complaints = ComplaintService::new(repos, create_event_bus());

        assert!(seed_demo_data(&users, &complaints).await.unwrap());
        assert!(!seed_demo_data(&users, &complaints).await.unwrap());

        let all = complaints
            .list_all(ComplaintQuery::default(), PageRequest::new(None, Some(50), 10))
            .await
            .unwrap();
        assert_eq!(all.total, COMPLAINTS.len() as u64);
        assert_eq!(users.list_technicians().await.unwrap().len(), 2);
    }
}
