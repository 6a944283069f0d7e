/// Listing and booking endpoints
use crate::{
    auth::AdminContext,
    booking::{Booking, BookingForm, BookingStats, BookingStatus, ChangeStatusRequest},
    catalog::Listing,
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build listing and booking routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/listings", get(list_listings))
        .route("/listings/:listing_id", get(get_listing))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/stats", get(booking_stats))
        .route("/bookings/:booking_id/status", put(change_booking_status))
        .route("/bookings/:booking_id", delete(remove_booking))
}

/// All listings
async fn list_listings(State(ctx): State<AppContext>) -> Json<Vec<Listing>> {
    Json(ctx.catalog.all().to_vec())
}

/// One listing by identifier
async fn get_listing(
    State(ctx): State<AppContext>,
    Path(listing_id): Path<String>,
) -> ApiResult<Json<Listing>> {
    let listing = ctx
        .catalog
        .get(&listing_id)
        .ok_or_else(|| ApiError::NotFound(format!("Listing {} not found", listing_id)))?;

    Ok(Json(listing.clone()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub message: String,
    pub booking: Booking,
}

/// Submit a booking
async fn create_booking(
    State(ctx): State<AppContext>,
    Json(form): Json<BookingForm>,
) -> ApiResult<(StatusCode, Json<BookingResponse>)> {
    let listing = ctx
        .catalog
        .get(&form.listing_id)
        .ok_or_else(|| ApiError::NotFound(format!("Listing {} not found", form.listing_id)))?;

    let booking = ctx.booking_store.submit(&form, listing).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Booking created successfully".to_string(),
            booking,
        }),
    ))
}

/// All bookings, newest first; admin only
async fn list_bookings(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
) -> ApiResult<Json<Vec<Booking>>> {
    Ok(Json(ctx.booking_store.list().await?))
}

/// Booking count and revenue summary; admin only
async fn booking_stats(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
) -> ApiResult<Json<BookingStats>> {
    Ok(Json(ctx.booking_store.stats().await?))
}

/// Move a booking to a new status; admin only
async fn change_booking_status(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
    Path(booking_id): Path<String>,
    Json(req): Json<ChangeStatusRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let status = BookingStatus::from_str(&req.status)?;
    let booking = ctx.booking_store.change_status(&booking_id, status).await?;

    Ok(Json(BookingResponse {
        message: "Booking status updated successfully".to_string(),
        booking,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub message: String,
}

/// Delete a booking; admin only, idempotent
async fn remove_booking(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
    Path(booking_id): Path<String>,
) -> ApiResult<Json<RemovedResponse>> {
    ctx.booking_store.remove(&booking_id).await?;

    Ok(Json(RemovedResponse {
        message: "Booking deleted successfully".to_string(),
    }))
}
