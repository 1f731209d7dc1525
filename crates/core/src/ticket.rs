//! Ticket value types: status, priority and category enums plus the ticket
//! and status-history records the lifecycle operates on.
//!
//! The enums are stored as lowercase text in the database and on the wire.
//! Parsing goes through [`std::str::FromStr`]; unknown values are reported
//! as [`UnknownVariant`] so callers can decide which error to surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DbId, Timestamp};

/// Returned when a string does not name any variant of a text enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The text form used in storage and JSON.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

define_text_enum! {
    /// Where a ticket is in its lifecycle.
    TicketStatus ("ticket status") {
        #[default]
        Open = "open",
        InProgress = "in_progress",
        Resolved = "resolved",
        Closed = "closed",
        Cancelled = "cancelled",
    }
}

define_text_enum! {
    /// Urgency assigned at intake.
    TicketPriority ("ticket priority") {
        Low = "low",
        #[default]
        Medium = "medium",
        High = "high",
        Critical = "critical",
    }
}

define_text_enum! {
    /// Problem area reported by the customer.
    TicketCategory ("ticket category") {
        Connection = "connection",
        Speed = "speed",
        Billing = "billing",
        Hardware = "hardware",
        #[default]
        Other = "other",
    }
}

/// One recorded status change. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    /// The status transitioned to.
    pub status: TicketStatus,
    pub timestamp: Timestamp,
    pub user_id: String,
    pub user_name: String,
    /// Free text from the actor; empty when none was given.
    pub notes: String,
}

/// A persisted support ticket together with its full audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub customer_id: DbId,
    pub customer_name: String,
    pub created_by: String,
    pub assigned_to: Option<DbId>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: TicketCategory,
    pub notes: Option<String>,
    pub resolution: Option<String>,
    /// File names or URLs attached by the reporter.
    pub attachments: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    /// Chronological; insertion order is the only order.
    pub status_history: Vec<StatusHistoryEntry>,
}

/// A ticket built by [`crate::lifecycle::create_ticket`] that has not been
/// stored yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub customer_id: DbId,
    pub customer_name: String,
    pub created_by: String,
    pub assigned_to: Option<DbId>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: TicketCategory,
    pub notes: Option<String>,
    pub attachments: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub status_history: Vec<StatusHistoryEntry>,
}
