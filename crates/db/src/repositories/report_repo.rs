//! Aggregate queries behind the dashboard and the admin summary report.

use sqlx::PgPool;

/// Read-only aggregate queries.
pub struct ReportRepo;

impl ReportRepo {
    /// Ticket counts grouped by status. Statuses with no tickets are absent.
    pub async fn count_tickets_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT status, COUNT(*) FROM tickets GROUP BY status ORDER BY status")
            .fetch_all(pool)
            .await
    }

    /// Ticket counts grouped by priority. Priorities with no tickets are absent.
    pub async fn count_tickets_by_priority(
        pool: &PgPool,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT priority, COUNT(*) FROM tickets GROUP BY priority ORDER BY priority",
        )
        .fetch_all(pool)
        .await
    }
}
