//! Domain model structs and DTOs.
//!
//! Each submodule contains the `FromRow` row type for its table plus the
//! create/update DTOs the repositories accept. Tickets convert their rows
//! into the domain [`helpdesk_core::ticket::Ticket`] instead of exposing
//! the row directly.

pub mod customer;
pub mod ticket;
pub mod user;
