//! Repository for the `customers` table.

use helpdesk_core::customer::STATUS_PENDING;
use helpdesk_core::search::like_pattern;
use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer, CustomerFilters, UpdateCustomer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, email, phone, address, city, postal_code, registration_date, status, \
    service_type, package_name, bandwidth, monthly_fee, installation_date, notes, \
    created_at, updated_at";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers \
                (name, email, phone, address, city, postal_code, registration_date, status, \
                 service_type, package_name, bandwidth, monthly_fee, installation_date, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()), $8, \
                     $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.postal_code)
            .bind(input.registration_date)
            .bind(input.status.as_deref().unwrap_or(STATUS_PENDING))
            .bind(&input.service_type)
            .bind(&input.package_name)
            .bind(&input.bandwidth)
            .bind(input.monthly_fee)
            .bind(input.installation_date)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List customers matching `filters`, newest registration first.
    pub async fn list_filtered(
        pool: &PgPool,
        filters: &CustomerFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let search = filters.search.as_deref().and_then(like_pattern);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${param_idx} OR email ILIKE ${param_idx} OR phone ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }
        if filters.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filters.service_type.is_some() {
            conditions.push(format!("service_type = ${param_idx}"));
            param_idx += 1;
        }
        if filters.city.is_some() {
            conditions.push(format!("city = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM customers {where_clause} \
             ORDER BY registration_date DESC, id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Customer>(&query);

        if let Some(ref pattern) = search {
            q = q.bind(pattern);
        }
        if let Some(ref status) = filters.status {
            q = q.bind(status);
        }
        if let Some(ref service_type) = filters.service_type {
            q = q.bind(service_type);
        }
        if let Some(ref city) = filters.city {
            q = q.bind(city);
        }
        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }

    /// Update a customer. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                phone = COALESCE($4, phone), \
                address = COALESCE($5, address), \
                city = COALESCE($6, city), \
                postal_code = COALESCE($7, postal_code), \
                registration_date = COALESCE($8, registration_date), \
                status = COALESCE($9, status), \
                service_type = COALESCE($10, service_type), \
                package_name = COALESCE($11, package_name), \
                bandwidth = COALESCE($12, bandwidth), \
                monthly_fee = COALESCE($13, monthly_fee), \
                installation_date = COALESCE($14, installation_date), \
                notes = COALESCE($15, notes) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.postal_code)
            .bind(input.registration_date)
            .bind(&input.status)
            .bind(&input.service_type)
            .bind(&input.package_name)
            .bind(&input.bandwidth)
            .bind(input.monthly_fee)
            .bind(input.installation_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a customer. Fails with a foreign-key violation while tickets
    /// still reference it. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The most recently registered customers.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers \
             ORDER BY registration_date DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total number of customers.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await
    }
}
