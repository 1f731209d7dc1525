//! Customer entity model and DTOs.

use chrono::NaiveDate;
use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub registration_date: Timestamp,
    pub status: String,
    pub service_type: String,
    pub package_name: Option<String>,
    pub bandwidth: Option<String>,
    /// Whole currency units per month.
    pub monthly_fee: Option<i64>,
    pub installation_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new customer.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCustomer {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    /// Defaults to the insert time when absent.
    pub registration_date: Option<Timestamp>,
    /// Defaults to `pending` when absent.
    pub status: Option<String>,
    #[serde(default)]
    pub service_type: String,
    pub package_name: Option<String>,
    pub bandwidth: Option<String>,
    #[validate(range(min = 0))]
    pub monthly_fee: Option<i64>,
    pub installation_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// DTO for updating a customer. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomer {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub registration_date: Option<Timestamp>,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub package_name: Option<String>,
    pub bandwidth: Option<String>,
    #[validate(range(min = 0))]
    pub monthly_fee: Option<i64>,
    pub installation_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Filters for customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilters {
    /// Free text matched against name, email and phone.
    pub search: Option<String>,
    pub status: Option<String>,
    pub service_type: Option<String>,
    pub city: Option<String>,
}
