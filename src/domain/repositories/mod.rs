//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to all per-aggregate repositories.
//! Consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let complaint = repos.complaints().find_by_id("c-1").await?;
//!     let notes = repos.notes().find_by_complaint("c-1").await?;
//! }
//! ```

use super::complaint::ComplaintRepository;
use super::note::NoteRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn complaints(&self) -> &dyn ComplaintRepository;
    fn notes(&self) -> &dyn NoteRepository;
}
