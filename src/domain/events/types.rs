//! Complaint change events
//!
//! Published after every successful mutation so connected clients know to refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::complaint::Complaint;
use crate::domain::user::{Actor, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintEventKind {
    ComplaintCreated,
    ComplaintAssigned,
    ComplaintStatusChanged,
    NoteAdded,
}

impl ComplaintEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComplaintCreated => "complaint_created",
            Self::ComplaintAssigned => "complaint_assigned",
            Self::ComplaintStatusChanged => "complaint_status_changed",
            Self::NoteAdded => "note_added",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintEvent {
    #[serde(rename = "type")]
    pub kind: ComplaintEventKind,
    pub complaint_id: String,
    pub status: String,
    pub customer_id: String,
    pub assigned_to: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ComplaintEvent {
    pub fn from_complaint(kind: ComplaintEventKind, complaint: &Complaint) -> Self {
        Self {
            kind,
            complaint_id: complaint.id.clone(),
            status: complaint.status.to_string(),
            customer_id: complaint.customer_id.clone(),
            assigned_to: complaint.assigned_to.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Same visibility rule as complaint listings
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        match actor.role {
            UserRole::Admin => true,
            UserRole::Customer => self.customer_id == actor.id,
            UserRole::Technician => self.assigned_to.as_deref() == Some(actor.id.as_str()),
        }
    }
}

/// Envelope carried on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub event: ComplaintEvent,
}

impl EventMessage {
    pub fn new(event: ComplaintEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::complaint::{ComplaintCategory, ComplaintPriority, NewComplaint};

    fn complaint() -> Complaint {
        let mut c = Complaint::new(
            NewComplaint {
                title: "No signal".into(),
                description: "Router lights are off".into(),
                category: ComplaintCategory::Technical,
                priority: ComplaintPriority::Medium,
                customer_id: "cust-1".into(),
            },
            Utc::now(),
        );
        c.assign_to("tech-1", Utc::now());
        c
    }

    #[test]
    fn serializes_with_type_and_hyphenated_status() {
        let event = ComplaintEvent::from_complaint(ComplaintEventKind::ComplaintAssigned, &complaint());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "complaint_assigned");
        assert_eq!(json["status"], "in-progress");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn visibility_matches_complaint_scope() {
        let event = ComplaintEvent::from_complaint(ComplaintEventKind::NoteAdded, &complaint());
        assert!(event.is_visible_to(&Actor::new("cust-1", UserRole::Customer)));
        assert!(!event.is_visible_to(&Actor::new("cust-9", UserRole::Customer)));
        assert!(event.is_visible_to(&Actor::new("tech-1", UserRole::Technician)));
        assert!(!event.is_visible_to(&Actor::new("tech-9", UserRole::Technician)));
        assert!(event.is_visible_to(&Actor::new("admin", UserRole::Admin)));
    }
}
