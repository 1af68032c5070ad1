//! Delivery handlers: creation, listing, and status transitions.

use crate::state::store::{AppState, StoredDelivery, TransitionResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use foodshare_core::{ContactInfo, Delivery, DeliveryStatus, DonationInfo, ReceiverInfo};
use foodshare_notify::StatusNotification;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Created when the surrounding application approves a donation request
/// and assigns a courier. The joined donation/receiver/donor records ride
/// along so routing and notifications work without another lookup.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    pub donation_id: String,
    pub request_id: String,
    #[serde(default)]
    pub courier_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub donation: Option<DonationInfo>,
    #[serde(default)]
    pub receiver: Option<ReceiverInfo>,
    #[serde(default)]
    pub donor: Option<ContactInfo>,
    #[serde(default)]
    pub receiver_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeliveriesQuery {
    pub courier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DeliveryStatus,
}

/// Fire-and-forget notification dispatch: one attempt, failure logged,
/// never blocks or fails the transition that triggered it.
pub(crate) fn dispatch_notification(state: Arc<AppState>, note: StatusNotification) {
    tokio::spawn(async move {
        if let Err(err) = state.notifier().send_status_notification(&note).await {
            tracing::error!(
                delivery_id = %note.delivery_id,
                error = %err,
                "failed to send delivery notification"
            );
        }
    });
}

pub async fn create_delivery(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDeliveryRequest>,
) -> (StatusCode, Json<Delivery>) {
    let delivery = Delivery {
        id: Uuid::new_v4().to_string(),
        status: DeliveryStatus::Assigned,
        pickup_time: None,
        delivery_time: None,
        notes: payload.notes,
        donation_id: payload.donation_id,
        request_id: payload.request_id,
        courier_id: payload.courier_id,
        created_at: Utc::now(),
    };

    let stored = StoredDelivery {
        delivery: delivery.clone(),
        donation: payload.donation,
        receiver: payload.receiver,
        donor: payload.donor,
        receiver_email: payload.receiver_email,
    };

    if let Some(email) = &stored.receiver_email {
        dispatch_notification(
            state.clone(),
            StatusNotification {
                delivery_id: delivery.id.clone(),
                new_status: DeliveryStatus::Assigned,
                subject_title: stored
                    .donation
                    .as_ref()
                    .map(|donation| donation.title.clone())
                    .unwrap_or_else(|| "Food Donation".to_string()),
                recipient_email: email.clone(),
                recipient_name: stored
                    .receiver
                    .as_ref()
                    .map(|receiver| receiver.full_name.clone())
                    .unwrap_or_else(|| "Valued User".to_string()),
            },
        );
    }

    state.insert_delivery(stored);
    tracing::info!(delivery_id = %delivery.id, "delivery created");

    (StatusCode::CREATED, Json(delivery))
}

pub async fn list_deliveries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeliveriesQuery>,
) -> Json<Vec<Delivery>> {
    Json(state.list_deliveries(query.courier_id.as_deref()))
}

pub async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path(delivery_id): Path<String>,
) -> Result<Json<Delivery>, (StatusCode, Json<serde_json::Value>)> {
    state.get_delivery(&delivery_id).map(Json).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Delivery not found" })),
    ))
}

pub async fn update_delivery_status(
    State(state): State<Arc<AppState>>,
    Path(delivery_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Delivery>, (StatusCode, Json<serde_json::Value>)> {
    match state.transition(&delivery_id, payload.status) {
        TransitionResult::Applied {
            delivery,
            notification,
        } => {
            tracing::info!(
                delivery_id = %delivery.id,
                status = %delivery.status,
                "delivery status updated"
            );
            if let Some(note) = notification {
                dispatch_notification(state.clone(), note);
            }
            Ok(Json(delivery))
        }
        TransitionResult::NotFound => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Delivery not found" })),
        )),
        TransitionResult::Rejected(err) => Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": err.to_string() })),
        )),
    }
}
