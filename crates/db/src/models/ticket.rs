//! Ticket and status-history rows, and their conversion into the domain
//! [`Ticket`] value.

use helpdesk_core::ticket::{
    StatusHistoryEntry, Ticket, TicketCategory, TicketPriority, TicketStatus, UnknownVariant,
};
use helpdesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `tickets` table. Enum columns are raw text.
#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub customer_id: DbId,
    pub customer_name: String,
    pub created_by: String,
    pub assigned_to: Option<DbId>,
    pub status: String,
    pub priority: String,
    pub category: String,
    pub notes: Option<String>,
    pub resolution: Option<String>,
    pub attachments: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
}

/// A row from the `ticket_status_history` table.
#[derive(Debug, Clone, FromRow)]
pub struct StatusHistoryRow {
    pub id: Uuid,
    pub ticket_id: DbId,
    pub seq: i32,
    pub status: String,
    pub recorded_at: Timestamp,
    pub user_id: String,
    pub user_name: String,
    pub notes: String,
}

fn decode_err(e: UnknownVariant) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

impl StatusHistoryRow {
    pub fn into_entry(self) -> Result<StatusHistoryEntry, sqlx::Error> {
        Ok(StatusHistoryEntry {
            id: self.id,
            status: self.status.parse::<TicketStatus>().map_err(decode_err)?,
            timestamp: self.recorded_at,
            user_id: self.user_id,
            user_name: self.user_name,
            notes: self.notes,
        })
    }
}

impl TicketRow {
    /// Combine the row with its (already ordered) history.
    pub fn into_ticket(self, status_history: Vec<StatusHistoryEntry>) -> Result<Ticket, sqlx::Error> {
        Ok(Ticket {
            id: self.id,
            title: self.title,
            description: self.description,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status: self.status.parse::<TicketStatus>().map_err(decode_err)?,
            priority: self.priority.parse::<TicketPriority>().map_err(decode_err)?,
            category: self.category.parse::<TicketCategory>().map_err(decode_err)?,
            notes: self.notes,
            resolution: self.resolution,
            attachments: self.attachments,
            created_at: self.created_at,
            updated_at: self.updated_at,
            resolved_at: self.resolved_at,
            closed_at: self.closed_at,
            status_history,
        })
    }
}

/// Result of [`crate::repositories::TicketRepo::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Ticket),
    /// The ticket row no longer exists.
    NotFound,
    /// The stored history has grown since the caller loaded the ticket.
    /// Nothing was written.
    Stale,
}

/// Typed list filters. All present filters are combined with `AND`.
#[derive(Debug, Clone, Default)]
pub struct TicketFilters {
    /// Free text matched against title, description and customer name.
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub assigned_to: Option<DbId>,
    pub created_by: Option<String>,
    pub customer_id: Option<DbId>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<Timestamp>,
    /// Exclusive upper bound on `created_at`.
    pub created_before: Option<Timestamp>,
}
