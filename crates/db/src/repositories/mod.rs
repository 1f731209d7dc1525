//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod customer_repo;
pub mod report_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use customer_repo::CustomerRepo;
pub use report_repo::ReportRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
