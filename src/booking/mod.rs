/// Booking store
///
/// Durable collection of booking records with pricing, a permissive
/// four-state status lifecycle, and per-currency aggregates.

mod store;

pub use store::BookingStore;

use crate::error::{ApiError, ApiResult};
use crate::pricing::{Currency, Price};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Booking status. Any status may move to any other; there are no
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> ApiResult<Self> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(ApiError::Validation(format!(
                "Invalid status '{}'. Must be one of pending, confirmed, completed, cancelled",
                s
            ))),
        }
    }
}

/// Raw booking submission, as received from the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub listing_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub check_in_date: String,
    #[serde(default)]
    pub check_out_date: String,
    #[serde(default = "default_guests")]
    pub number_of_guests: i64,
    #[serde(default)]
    pub special_requests: Option<String>,
}

fn default_guests() -> i64 {
    1
}

/// A stored booking. Listing details are denormalized at creation time;
/// status is the only field that changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub listing_id: String,
    pub listing_title: String,
    pub listing_category: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub id_number: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: i64,
    pub special_requests: String,
    pub status: BookingStatus,
    pub total_amount: Price,
    pub created_at: DateTime<Utc>,
}

/// Status-change request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

/// Revenue total for one currency; revenue is never summed across
/// currencies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub total: i64,
}

/// Booking counts per status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Read-only booking summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: i64,
    pub by_status: StatusCounts,
    pub revenue: Vec<CurrencyTotal>,
}
