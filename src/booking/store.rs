/// Booking store implementation over SQLite
use crate::{
    booking::{Booking, BookingForm, BookingStats, BookingStatus, CurrencyTotal, StatusCounts},
    catalog::Listing,
    error::{ApiError, ApiResult},
    pricing::{self, Currency, Price},
    validation,
};
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Booking store service
#[derive(Clone)]
pub struct BookingStore {
    db: SqlitePool,
}

impl BookingStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Validate and persist a booking submission
    pub async fn submit(&self, form: &BookingForm, listing: &Listing) -> ApiResult<Booking> {
        let today = Utc::now().date_naive();
        let valid = validation::validate_booking_form(form, today).map_err(ApiError::InvalidForm)?;

        let total_amount = pricing::quote(
            &listing.category,
            valid.check_in,
            valid.check_out,
            valid.number_of_guests,
        );

        let booking = Booking {
            id: generate_booking_id(),
            listing_id: listing.id.clone(),
            listing_title: listing.title.clone(),
            listing_category: listing.category.clone(),
            customer_name: valid.full_name,
            email: valid.email,
            phone: valid.phone,
            id_number: valid.id_number,
            check_in_date: valid.check_in,
            check_out_date: valid.check_out,
            number_of_guests: valid.number_of_guests,
            special_requests: valid.special_requests,
            status: BookingStatus::Pending,
            total_amount,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO booking (id, listing_id, listing_title, listing_category,
                 customer_name, email, phone, id_number, check_in_date, check_out_date,
                 number_of_guests, special_requests, status, currency, total_amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )
        .bind(&booking.id)
        .bind(&booking.listing_id)
        .bind(&booking.listing_title)
        .bind(&booking.listing_category)
        .bind(&booking.customer_name)
        .bind(&booking.email)
        .bind(&booking.phone)
        .bind(&booking.id_number)
        .bind(booking.check_in_date.to_string())
        .bind(booking.check_out_date.to_string())
        .bind(booking.number_of_guests)
        .bind(&booking.special_requests)
        .bind(booking.status.as_str())
        .bind(booking.total_amount.currency.code())
        .bind(booking.total_amount.amount)
        .bind(booking.created_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        tracing::info!(
            booking_id = %booking.id,
            listing_id = %booking.listing_id,
            total = %booking.total_amount,
            "booking created"
        );

        Ok(booking)
    }

    /// All bookings, most recently created first
    pub async fn list(&self) -> ApiResult<Vec<Booking>> {
        let rows = sqlx::query(
            "SELECT id, listing_id, listing_title, listing_category, customer_name,
                    email, phone, id_number, check_in_date, check_out_date,
                    number_of_guests, special_requests, status, currency, total_amount, created_at
             FROM booking
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Fetch a booking by identifier
    pub async fn get(&self, id: &str) -> ApiResult<Booking> {
        let row = sqlx::query(
            "SELECT id, listing_id, listing_title, listing_category, customer_name,
                    email, phone, id_number, check_in_date, check_out_date,
                    number_of_guests, special_requests, status, currency, total_amount, created_at
             FROM booking WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound(format!("Booking {} not found", id)))?;

        booking_from_row(&row)
    }

    /// Move a booking to a new status. Any status may move to any other.
    pub async fn change_status(&self, id: &str, status: BookingStatus) -> ApiResult<Booking> {
        let result = sqlx::query("UPDATE booking SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Booking {} not found", id)));
        }

        self.get(id).await
    }

    /// Delete a booking; silently a no-op when the id is absent
    pub async fn remove(&self, id: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM booking WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Count and revenue summary; revenue is kept per currency
    pub async fn stats(&self) -> ApiResult<BookingStats> {
        let status_rows = sqlx::query("SELECT status, COUNT(*) AS n FROM booking GROUP BY status")
            .fetch_all(&self.db)
            .await
            .map_err(ApiError::Database)?;

        let mut total = 0;
        let mut by_status = StatusCounts::default();
        for row in &status_rows {
            let status: String = row.get("status");
            let n: i64 = row.get("n");
            total += n;
            match BookingStatus::from_str(&status)? {
                BookingStatus::Pending => by_status.pending = n,
                BookingStatus::Confirmed => by_status.confirmed = n,
                BookingStatus::Completed => by_status.completed = n,
                BookingStatus::Cancelled => by_status.cancelled = n,
            }
        }

        let revenue_rows = sqlx::query(
            "SELECT currency, SUM(total_amount) AS total FROM booking GROUP BY currency ORDER BY currency",
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let mut revenue = Vec::new();
        for row in &revenue_rows {
            let code: String = row.get("currency");
            let currency = Currency::from_code(&code)
                .ok_or_else(|| ApiError::Internal(format!("Unknown currency code: {}", code)))?;
            revenue.push(CurrencyTotal {
                currency,
                total: row.get("total"),
            });
        }

        Ok(BookingStats {
            total,
            by_status,
            revenue,
        })
    }
}

/// Time-based identifier with a random suffix; collisions are negligible
/// for interactive use
fn generate_booking_id() -> String {
    let timestamp = Utc::now().timestamp_millis();
    let random = rand::thread_rng().gen_range(0..1000);
    format!("B{}{:03}", timestamp, random)
}

fn booking_from_row(row: &SqliteRow) -> ApiResult<Booking> {
    let check_in: String = row.get("check_in_date");
    let check_out: String = row.get("check_out_date");
    let status: String = row.get("status");
    let currency: String = row.get("currency");
    let created_at: DateTime<Utc> = row.get("created_at");

    Ok(Booking {
        id: row.get("id"),
        listing_id: row.get("listing_id"),
        listing_title: row.get("listing_title"),
        listing_category: row.get("listing_category"),
        customer_name: row.get("customer_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        id_number: row.get("id_number"),
        check_in_date: parse_stored_date(&check_in)?,
        check_out_date: parse_stored_date(&check_out)?,
        number_of_guests: row.get("number_of_guests"),
        special_requests: row.get("special_requests"),
        status: BookingStatus::from_str(&status)?,
        total_amount: Price {
            currency: Currency::from_code(&currency)
                .ok_or_else(|| ApiError::Internal(format!("Unknown currency code: {}", currency)))?,
            amount: row.get("total_amount"),
        },
        created_at,
    })
}

fn parse_stored_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ApiError::Internal(format!("Invalid stored date '{}': {}", raw, e)))
}
