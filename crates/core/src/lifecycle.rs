//! Ticket lifecycle: creation, status transitions and field edits.
//!
//! Every function here is pure. The caller supplies the current ticket, the
//! acting user and the clock reading, and gets back either a complete new
//! ticket value or a [`LifecycleError`]. Nothing is mutated in place, so a
//! failed call leaves the caller's ticket exactly as it was and there is
//! nothing to persist.
//!
//! Transition rules:
//! - any status may move to any other status, including backwards
//!   (`resolved -> open`) and out of `closed` / `cancelled`;
//! - the one exception is `closed`, which is only reachable from `resolved`.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::ticket::{
    NewTicket, StatusHistoryEntry, Ticket, TicketCategory, TicketPriority, TicketStatus,
};
use crate::types::{DbId, Timestamp};

/// Note attached to the seed history entry of every new ticket.
pub const CREATED_NOTE: &str = "Tiket dibuat";

/// Actor id used when no signed-in user is available.
pub const SYSTEM_ACTOR_ID: &str = "system";

/// Display name used when no signed-in user is available.
pub const SYSTEM_ACTOR_NAME: &str = "System";

/* --------------------------------------------------------------------------
Errors
-------------------------------------------------------------------------- */

/// Why a lifecycle operation refused to produce a ticket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Required fields were empty or absent. Lists every offending field.
    #[error("Missing required fields: {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    /// The requested status is not one of the five known values.
    #[error("Invalid ticket status '{0}'. Must be one of: open, in_progress, resolved, closed, cancelled")]
    InvalidStatus(String),

    /// The closed-gate rule rejected the move.
    #[error("Ticket must be resolved before closing (current status: {current})")]
    InvalidTransition {
        current: TicketStatus,
        requested: TicketStatus,
    },
}

/* --------------------------------------------------------------------------
Actor
-------------------------------------------------------------------------- */

/// The user a transition is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    /// The fallback identity for transitions made without a session.
    pub fn system() -> Self {
        Self {
            id: SYSTEM_ACTOR_ID.to_string(),
            name: SYSTEM_ACTOR_NAME.to_string(),
        }
    }

    /// Build an actor from a stored user. A blank name falls back to the
    /// system identity as a whole so id and name never disagree.
    pub fn from_user(user_id: DbId, name: &str) -> Self {
        if name.trim().is_empty() {
            return Self::system();
        }
        Self {
            id: user_id.to_string(),
            name: name.to_string(),
        }
    }
}

/* --------------------------------------------------------------------------
Transitions
-------------------------------------------------------------------------- */

/// Check the closed-gate: `closed` requires a `resolved` ticket.
pub fn validate_transition(
    current: TicketStatus,
    requested: TicketStatus,
) -> Result<(), LifecycleError> {
    if requested == TicketStatus::Closed && current != TicketStatus::Resolved {
        return Err(LifecycleError::InvalidTransition { current, requested });
    }
    Ok(())
}

/// Parse `requested` and apply it to `current`.
///
/// Unknown status strings fail with [`LifecycleError::InvalidStatus`];
/// they are never coerced to a nearby value.
pub fn apply_transition(
    current: &Ticket,
    requested: &str,
    actor: &Actor,
    notes: Option<&str>,
    now: Timestamp,
) -> Result<Ticket, LifecycleError> {
    let status = requested
        .parse::<TicketStatus>()
        .map_err(|e| LifecycleError::InvalidStatus(e.value))?;
    transition(current, status, actor, notes, now)
}

/// Apply an already-typed status change to `current`.
pub fn transition(
    current: &Ticket,
    requested: TicketStatus,
    actor: &Actor,
    notes: Option<&str>,
    now: Timestamp,
) -> Result<Ticket, LifecycleError> {
    validate_transition(current.status, requested)?;

    let mut next = current.clone();
    next.status = requested;
    next.updated_at = now;

    if requested == TicketStatus::Resolved && next.resolved_at.is_none() {
        next.resolved_at = Some(now);
    }
    if requested == TicketStatus::Closed {
        next.closed_at = Some(now);
    }

    next.status_history
        .push(history_entry(requested, actor, notes.unwrap_or_default(), now));

    Ok(next)
}

fn history_entry(
    status: TicketStatus,
    actor: &Actor,
    notes: &str,
    now: Timestamp,
) -> StatusHistoryEntry {
    StatusHistoryEntry {
        id: Uuid::new_v4(),
        status,
        timestamp: now,
        user_id: actor.id.clone(),
        user_name: actor.name.clone(),
        notes: notes.to_string(),
    }
}

/* --------------------------------------------------------------------------
Creation
-------------------------------------------------------------------------- */

/// Intake form for a new ticket.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TicketDraft {
    /// Must contain a non-whitespace character.
    #[serde(default)]
    pub title: String,
    /// Must contain a non-whitespace character.
    #[serde(default)]
    pub description: String,
    #[validate(required)]
    pub customer_id: Option<DbId>,
    /// Denormalized customer name, filled in from the customer record by the
    /// caller when the form does not carry it.
    #[serde(default)]
    pub customer_name: String,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Build a new `open` ticket with its seed history entry.
pub fn create_ticket(
    draft: &TicketDraft,
    actor: &Actor,
    now: Timestamp,
) -> Result<NewTicket, LifecycleError> {
    let mut fields = blank_fields(Some(draft.title.as_str()), Some(draft.description.as_str()));
    if let Err(errors) = draft.validate() {
        fields.extend(errors.field_errors().keys().map(|k| k.to_string()));
    }
    if !fields.is_empty() {
        fields.sort();
        fields.dedup();
        return Err(LifecycleError::Validation { fields });
    }

    // `required` passed, so the id is present.
    let customer_id = draft.customer_id.unwrap_or_default();

    Ok(NewTicket {
        title: draft.title.clone(),
        description: draft.description.clone(),
        customer_id,
        customer_name: draft.customer_name.clone(),
        created_by: actor.id.clone(),
        assigned_to: draft.assigned_to,
        status: TicketStatus::Open,
        priority: draft.priority.unwrap_or_default(),
        category: draft.category.unwrap_or_default(),
        notes: draft.notes.clone(),
        attachments: draft.attachments.clone(),
        created_at: now,
        updated_at: now,
        status_history: vec![history_entry(TicketStatus::Open, actor, CREATED_NOTE, now)],
    })
}

/// Required text fields set to empty or whitespace-only text. `None` means
/// the field is not being set and is skipped.
fn blank_fields(title: Option<&str>, description: Option<&str>) -> Vec<String> {
    [("title", title), ("description", description)]
        .into_iter()
        .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
}

/* --------------------------------------------------------------------------
Field edits
-------------------------------------------------------------------------- */

/// Partial update from the ticket edit form. `None` leaves a field as is.
///
/// `assigned_to` uses a nested option so the form can clear the assignee:
/// absent keeps it, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub customer_id: Option<DbId>,
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<DbId>>,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub notes: Option<String>,
    pub resolution: Option<String>,
    /// Replaces the whole attachment list.
    pub attachments: Option<Vec<String>>,
    /// Raw status text; goes through [`apply_transition`] when present.
    pub status: Option<String>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<DbId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<DbId>::deserialize(deserializer).map(Some)
}

/// Apply a field edit, then a status transition if the edit carries one.
///
/// The edit's `notes` are used both as the ticket's notes and as the notes
/// of the appended history entry.
pub fn apply_edit(
    current: &Ticket,
    edit: &TicketEdit,
    actor: &Actor,
    now: Timestamp,
) -> Result<Ticket, LifecycleError> {
    let blank = blank_fields(edit.title.as_deref(), edit.description.as_deref());
    if !blank.is_empty() {
        return Err(LifecycleError::Validation { fields: blank });
    }

    let mut next = current.clone();
    if let Some(title) = &edit.title {
        next.title = title.clone();
    }
    if let Some(description) = &edit.description {
        next.description = description.clone();
    }
    if let Some(customer_id) = edit.customer_id {
        next.customer_id = customer_id;
    }
    if let Some(customer_name) = &edit.customer_name {
        next.customer_name = customer_name.clone();
    }
    if let Some(assigned_to) = edit.assigned_to {
        next.assigned_to = assigned_to;
    }
    if let Some(priority) = edit.priority {
        next.priority = priority;
    }
    if let Some(category) = edit.category {
        next.category = category;
    }
    if let Some(notes) = &edit.notes {
        next.notes = Some(notes.clone());
    }
    if let Some(resolution) = &edit.resolution {
        next.resolution = Some(resolution.clone());
    }
    if let Some(attachments) = &edit.attachments {
        next.attachments = attachments.clone();
    }
    next.updated_at = now;

    match &edit.status {
        Some(status) => apply_transition(&next, status, actor, edit.notes.as_deref(), now),
        None => Ok(next),
    }
}

/// Reassign a ticket. Does not touch the status history.
pub fn assign(current: &Ticket, assignee: Option<DbId>, now: Timestamp) -> Ticket {
    let mut next = current.clone();
    next.assigned_to = assignee;
    next.updated_at = now;
    next
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
