//! Complaint domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::user::{Actor, UserRole};
use crate::shared::DomainError;

/// Complaint lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplaintStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Open,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Resolved and closed complaints carry a `resolved_at` stamp
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(DomainError::Validation(format!(
                "Invalid status '{}'. Expected one of: open, in-progress, resolved, closed",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplaintCategory {
    Technical,
    Billing,
    Service,
    #[default]
    General,
}

impl ComplaintCategory {
    pub const ALL: [ComplaintCategory; 4] = [
        ComplaintCategory::Technical,
        ComplaintCategory::Billing,
        ComplaintCategory::Service,
        ComplaintCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Billing => "billing",
            Self::Service => "service",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "technical" => Ok(Self::Technical),
            "billing" => Ok(Self::Billing),
            "service" => Ok(Self::Service),
            "general" => Ok(Self::General),
            other => Err(DomainError::Validation(format!(
                "Invalid category '{}'. Expected one of: technical, billing, service, general",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl ComplaintPriority {
    pub const ALL: [ComplaintPriority; 4] = [
        ComplaintPriority::Low,
        ComplaintPriority::Medium,
        ComplaintPriority::High,
        ComplaintPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for ComplaintPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(DomainError::Validation(format!(
                "Invalid priority '{}'. Expected one of: low, medium, high, urgent",
                other
            ))),
        }
    }
}

/// Customer complaint
#[derive(Debug, Clone)]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    /// The customer who filed it
    pub customer_id: String,
    /// Technician currently working it
    pub assigned_to: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set iff status is resolved or closed
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    pub fn new(new: NewComplaint, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            category: new.category,
            priority: new.priority,
            status: ComplaintStatus::Open,
            customer_id: new.customer_id,
            assigned_to: None,
            remarks: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    /// Hand the complaint to a technician. Work restarts, so the status is
    /// forced to in-progress whatever it was before.
    pub fn assign_to(&mut self, technician_id: impl Into<String>, now: DateTime<Utc>) {
        self.assigned_to = Some(technician_id.into());
        self.set_status(ComplaintStatus::InProgress, now);
    }

    pub fn change_status(
        &mut self,
        status: ComplaintStatus,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(remarks) = remarks {
            self.remarks = Some(remarks);
        }
        self.set_status(status, now);
    }

    fn set_status(&mut self, status: ComplaintStatus, now: DateTime<Utc>) {
        self.status = status;
        self.resolved_at = if status.is_terminal() { Some(now) } else { None };
        self.updated_at = now;
    }

    /// Customers see what they filed, technicians what they are assigned,
    /// admins everything.
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        match actor.role {
            UserRole::Admin => true,
            UserRole::Customer => self.customer_id == actor.id,
            UserRole::Technician => self.assigned_to.as_deref() == Some(actor.id.as_str()),
        }
    }
}

/// Fields supplied when a customer files a complaint
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub customer_id: String,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Complaint {
        Complaint::new(
            NewComplaint {
                title: "Leak".into(),
                description: "Kitchen sink leaking for 2 days".into(),
                category: ComplaintCategory::Technical,
                priority: ComplaintPriority::High,
                customer_id: "cust-1".into(),
            },
            Utc::now(),
        )
    }

    fn resolved_invariant_holds(c: &Complaint) -> bool {
        c.resolved_at.is_some() == c.status.is_terminal()
    }

    #[test]
    fn new_complaint_is_open_and_unassigned() {
        let c = sample();
        assert_eq!(c.status, ComplaintStatus::Open);
        assert!(c.assigned_to.is_none());
        assert!(c.resolved_at.is_none());
        assert_eq!(c.customer_id, "cust-1");
    }

    #[test]
    fn assignment_forces_in_progress_from_any_status() {
        for prior in ComplaintStatus::ALL {
            let mut c = sample();
            c.change_status(prior, None, Utc::now());
            c.assign_to("tech-1", Utc::now());
            assert_eq!(c.status, ComplaintStatus::InProgress);
            assert_eq!(c.assigned_to.as_deref(), Some("tech-1"));
            assert!(resolved_invariant_holds(&c));
        }
    }

    #[test]
    fn resolved_at_tracks_terminal_statuses() {
        let mut c = sample();
        let later = Utc::now() + Duration::minutes(5);
        for next in [
            ComplaintStatus::Resolved,
            ComplaintStatus::Open,
            ComplaintStatus::Closed,
            ComplaintStatus::InProgress,
        ] {
            c.change_status(next, None, later);
            assert!(resolved_invariant_holds(&c), "violated for {}", next);
        }
        c.change_status(ComplaintStatus::Resolved, None, later);
        assert_eq!(c.resolved_at, Some(later));
    }

    #[test]
    fn remarks_are_only_replaced_when_given() {
        let mut c = sample();
        c.change_status(ComplaintStatus::InProgress, Some("on site".into()), Utc::now());
        c.change_status(ComplaintStatus::Resolved, None, Utc::now());
        assert_eq!(c.remarks.as_deref(), Some("on site"));
    }

    #[test]
    fn visibility_follows_role() {
        let mut c = sample();
        c.assign_to("tech-1", Utc::now());

        assert!(c.is_visible_to(&Actor::new("cust-1", UserRole::Customer)));
        assert!(!c.is_visible_to(&Actor::new("cust-2", UserRole::Customer)));
        assert!(c.is_visible_to(&Actor::new("tech-1", UserRole::Technician)));
        assert!(!c.is_visible_to(&Actor::new("tech-2", UserRole::Technician)));
        assert!(c.is_visible_to(&Actor::new("anyone", UserRole::Admin)));
    }

    #[test]
    fn status_wire_name_keeps_the_hyphen() {
        assert_eq!(ComplaintStatus::InProgress.as_str(), "in-progress");
        assert_eq!(
            "in-progress".parse::<ComplaintStatus>().unwrap(),
            ComplaintStatus::InProgress
        );
        assert!("in_progress".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        assert!("plumbing".parse::<ComplaintCategory>().is_err());
        assert!("critical".parse::<ComplaintPriority>().is_err());
    }
}
