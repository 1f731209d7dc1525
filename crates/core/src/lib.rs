//! Domain logic for the helpdesk backend.
//!
//! This crate has no I/O. The ticket lifecycle, role rules, and report
//! assembly live here so both the repository and HTTP layers share them.

pub mod customer;
pub mod error;
pub mod lifecycle;
pub mod report;
pub mod roles;
pub mod search;
pub mod ticket;
pub mod types;
pub mod user;
