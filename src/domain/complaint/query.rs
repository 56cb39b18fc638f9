use super::{ComplaintCategory, ComplaintPriority, ComplaintStatus};
use crate::domain::user::{Actor, UserRole};

/// Which complaints a listing may contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintScope {
    All,
    CreatedBy(String),
    AssignedTo(String),
}

impl ComplaintScope {
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            UserRole::Admin => ComplaintScope::All,
            UserRole::Customer => ComplaintScope::CreatedBy(actor.id.clone()),
            UserRole::Technician => ComplaintScope::AssignedTo(actor.id.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComplaintFilter {
    pub scope: ComplaintScope,
    pub status: Option<ComplaintStatus>,
    pub priority: Option<ComplaintPriority>,
    pub category: Option<ComplaintCategory>,
}

impl ComplaintFilter {
    pub fn scoped(scope: ComplaintScope) -> Self {
        Self {
            scope,
            status: None,
            priority: None,
            category: None,
        }
    }

    pub fn all() -> Self {
        Self::scoped(ComplaintScope::All)
    }

    pub fn with_status(mut self, status: ComplaintStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: ComplaintPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}
