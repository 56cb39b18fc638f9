//! Complaint aggregate
//!
//! Contains the Complaint entity, listing filters, and repository interface.

pub mod model;
pub mod query;
pub mod repository;

pub use model::{Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus, NewComplaint};
pub use query::{ComplaintFilter, ComplaintScope};
pub use repository::ComplaintRepository;
