//! Complaint handling: filing, triage, status updates, notes, analytics

pub mod analytics;
pub mod service;

pub use analytics::{AnalyticsService, ComplaintAnalytics, MonthlyCount, Overview};
pub use service::{
    ComplaintDetails, ComplaintDraft, ComplaintQuery, ComplaintService, NoteDetails,
};
