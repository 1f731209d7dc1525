//! Repository for the `tickets` and `ticket_status_history` tables.
//!
//! The history table is append-only from this repository's point of view:
//! there is no method that updates or deletes individual history rows.
//! Rows disappear only when their ticket is deleted (`ON DELETE CASCADE`).

use std::collections::HashMap;

use helpdesk_core::search::like_pattern;
use helpdesk_core::ticket::{NewTicket, StatusHistoryEntry, Ticket};
use helpdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::ticket::{SaveOutcome, StatusHistoryRow, TicketFilters, TicketRow};

/// Column list for `tickets` queries.
const COLUMNS: &str = "\
    id, title, description, customer_id, customer_name, created_by, assigned_to, \
    status, priority, category, notes, resolution, attachments, \
    created_at, updated_at, resolved_at, closed_at";

/// Column list for `ticket_status_history` queries.
const HISTORY_COLUMNS: &str =
    "id, ticket_id, seq, status, recorded_at, user_id, user_name, notes";

/// Provides persistence for tickets and their status history.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket and its seed history in one transaction.
    pub async fn create(pool: &PgPool, input: &NewTicket) -> Result<Ticket, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tickets \
                (title, description, customer_id, customer_name, created_by, assigned_to, \
                 status, priority, category, notes, attachments, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.customer_id)
            .bind(&input.customer_name)
            .bind(&input.created_by)
            .bind(input.assigned_to)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.category.as_str())
            .bind(&input.notes)
            .bind(&input.attachments)
            .bind(input.created_at)
            .bind(input.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        Self::append_history(&mut tx, row.id, 0, &input.status_history).await?;
        tx.commit().await?;

        row.into_ticket(input.status_history.clone())
    }

    /// Find a ticket by ID, with its full history.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => {
                let history = Self::history(pool, id).await?;
                row.into_ticket(history).map(Some)
            }
            None => Ok(None),
        }
    }

    /// The status history of one ticket, oldest first.
    pub async fn history(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM ticket_status_history \
             WHERE ticket_id = $1 ORDER BY seq"
        );
        sqlx::query_as::<_, StatusHistoryRow>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(StatusHistoryRow::into_entry)
            .collect()
    }

    /// List tickets matching `filters`, newest first, with their histories.
    pub async fn list_filtered(
        pool: &PgPool,
        filters: &TicketFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let search = filters.search.as_deref().and_then(like_pattern);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if search.is_some() {
            conditions.push(format!(
                "(title ILIKE ${param_idx} OR description ILIKE ${param_idx} \
                  OR customer_name ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }
        if filters.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filters.priority.is_some() {
            conditions.push(format!("priority = ${param_idx}"));
            param_idx += 1;
        }
        if filters.category.is_some() {
            conditions.push(format!("category = ${param_idx}"));
            param_idx += 1;
        }
        if filters.assigned_to.is_some() {
            conditions.push(format!("assigned_to = ${param_idx}"));
            param_idx += 1;
        }
        if filters.created_by.is_some() {
            conditions.push(format!("created_by = ${param_idx}"));
            param_idx += 1;
        }
        if filters.customer_id.is_some() {
            conditions.push(format!("customer_id = ${param_idx}"));
            param_idx += 1;
        }
        if filters.created_from.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }
        if filters.created_before.is_some() {
            conditions.push(format!("created_at < ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM tickets {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, TicketRow>(&query);

        if let Some(ref pattern) = search {
            q = q.bind(pattern);
        }
        if let Some(status) = filters.status {
            q = q.bind(status.as_str());
        }
        if let Some(priority) = filters.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(category) = filters.category {
            q = q.bind(category.as_str());
        }
        if let Some(assigned_to) = filters.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(ref created_by) = filters.created_by {
            q = q.bind(created_by);
        }
        if let Some(customer_id) = filters.customer_id {
            q = q.bind(customer_id);
        }
        if let Some(from) = filters.created_from {
            q = q.bind(from);
        }
        if let Some(before) = filters.created_before {
            q = q.bind(before);
        }
        q = q.bind(limit).bind(offset);

        let rows = q.fetch_all(pool).await?;
        Self::attach_histories(pool, rows).await
    }

    /// Persist a ticket produced by the lifecycle.
    ///
    /// `persisted_len` is the history length of the ticket as it was loaded;
    /// only entries past that index are inserted. The ticket row is locked
    /// first, and if the stored history no longer has `persisted_len`
    /// entries the save is abandoned as [`SaveOutcome::Stale`], so a stale
    /// copy can never overwrite a newer status.
    pub async fn save(
        pool: &PgPool,
        ticket: &Ticket,
        persisted_len: usize,
    ) -> Result<SaveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM tickets WHERE id = $1 FOR UPDATE")
                .bind(ticket.id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(SaveOutcome::NotFound);
        }

        let stored_len: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ticket_status_history WHERE ticket_id = $1")
                .bind(ticket.id)
                .fetch_one(&mut *tx)
                .await?;
        if usize::try_from(stored_len).ok() != Some(persisted_len) {
            tracing::debug!(
                ticket_id = ticket.id,
                stored_len,
                persisted_len,
                "Rejected save from a stale ticket copy",
            );
            return Ok(SaveOutcome::Stale);
        }

        let query = format!(
            "UPDATE tickets SET \
                title = $2, description = $3, customer_id = $4, customer_name = $5, \
                assigned_to = $6, status = $7, priority = $8, category = $9, \
                notes = $10, resolution = $11, attachments = $12, updated_at = $13, \
                resolved_at = $14, closed_at = $15 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(ticket.id)
            .bind(&ticket.title)
            .bind(&ticket.description)
            .bind(ticket.customer_id)
            .bind(&ticket.customer_name)
            .bind(ticket.assigned_to)
            .bind(ticket.status.as_str())
            .bind(ticket.priority.as_str())
            .bind(ticket.category.as_str())
            .bind(&ticket.notes)
            .bind(&ticket.resolution)
            .bind(&ticket.attachments)
            .bind(ticket.updated_at)
            .bind(ticket.resolved_at)
            .bind(ticket.closed_at)
            .fetch_one(&mut *tx)
            .await?;

        let appended = ticket.status_history.get(persisted_len..).unwrap_or(&[]);
        Self::append_history(&mut tx, row.id, persisted_len, appended).await?;
        tx.commit().await?;

        row.into_ticket(ticket.status_history.clone())
            .map(SaveOutcome::Saved)
    }

    /// Delete a ticket and, by cascade, its history. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete several tickets at once. Returns how many were removed.
    pub async fn delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert `entries` with sequence numbers starting at `start_seq`.
    async fn append_history(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: DbId,
        start_seq: usize,
        entries: &[StatusHistoryEntry],
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_status_history ({HISTORY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        for (offset, entry) in entries.iter().enumerate() {
            let seq = i32::try_from(start_seq + offset)
                .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            sqlx::query(&query)
                .bind(entry.id)
                .bind(ticket_id)
                .bind(seq)
                .bind(entry.status.as_str())
                .bind(entry.timestamp)
                .bind(&entry.user_id)
                .bind(&entry.user_name)
                .bind(&entry.notes)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Load the histories for `rows` in one query and assemble tickets,
    /// preserving row order.
    async fn attach_histories(
        pool: &PgPool,
        rows: Vec<TicketRow>,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM ticket_status_history \
             WHERE ticket_id = ANY($1) ORDER BY ticket_id, seq"
        );
        let history_rows = sqlx::query_as::<_, StatusHistoryRow>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_ticket: HashMap<DbId, Vec<StatusHistoryEntry>> = HashMap::new();
        for h in history_rows {
            let ticket_id = h.ticket_id;
            by_ticket.entry(ticket_id).or_default().push(h.into_entry()?);
        }

        rows.into_iter()
            .map(|row| {
                let history = by_ticket.remove(&row.id).unwrap_or_default();
                row.into_ticket(history)
            })
            .collect()
    }
}
