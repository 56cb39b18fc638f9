//! SeaORM entities

pub mod complaint;
pub mod complaint_note;
pub mod user;

pub use complaint::Entity as Complaint;
pub use complaint_note::Entity as ComplaintNote;
pub use user::Entity as User;
