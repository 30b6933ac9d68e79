use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::{
        admin::ActionResponse,
        booking::{BookingView, BookingsQuery, CreateBookingRequest},
    },
    error::AppError,
    services::booking_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "bookings",
    params(("date" = String, Query, description = "Calendar date, YYYY-MM-DD")),
    responses((status = 200, description = "Bookings for the date", body = [BookingView]))
)]
/// The schedule for one calendar date.
pub async fn list_bookings(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<BookingsQuery>>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(booking_service::list_by_date(&state, &query.date).await?))
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Slot booked", body = BookingView),
        (status = 409, description = "Slot already taken"),
    )
)]
/// Book one of the fixed slots for the authenticated user.
pub async fn create_booking(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Valid(Json(payload)): Valid<Json<CreateBookingRequest>>,
) -> Result<Json<BookingView>, AppError> {
    Ok(Json(booking_service::create(&state, &actor, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = ActionResponse),
        (status = 403, description = "Caller is neither the owner nor an admin"),
    )
)]
/// Cancel a booking.
pub async fn delete_booking(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    booking_service::delete(&state, &actor, id).await?;
    Ok(Json(ActionResponse::new("booking cancelled")))
}

/// Configure the booking routes subtree.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}", delete(delete_booking))
        .route_layer(middleware::from_fn_with_state(state, super::require_user))
}
