pub mod auth;
pub mod customers;
pub mod reports;
pub mod tickets;
pub mod users;
