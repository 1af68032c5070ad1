//! Core data models for the delivery engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Combine separately-nullable latitude/longitude columns into a
    /// position. Absence of either component means the location is unknown.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Whether both components are within valid WGS84 bounds.
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Dropoff,
}

/// A single pickup or dropoff point generated from an active delivery.
///
/// Stops are ephemeral: they are produced for one route calculation and
/// never persisted. A dropoff always shares its `delivery_id` with the
/// pickup it depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub kind: StopKind,
    pub delivery_id: String,
    /// Title of the donation being moved
    pub subject_title: String,
    pub address: String,
    /// Missing when the address has not been geocoded
    pub coordinate: Option<Coordinate>,
    pub contact_name: String,
    pub contact_phone: Option<String>,
}

/// Status lifecycle of a delivery.
///
/// `Assigned -> InTransit -> Delivered`, with `Failed` reachable from
/// either non-terminal state. `Delivered` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Assigned,
    InTransit,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    /// Position on the linear progress track, for presentation.
    /// `Failed` is off the track and reports `None`.
    pub fn progress_index(&self) -> Option<usize> {
        match self {
            Self::Assigned => Some(0),
            Self::InTransit => Some(1),
            Self::Delivered => Some(2),
            Self::Failed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delivery record as owned by the backing store.
///
/// Created when a donation request is approved. The engine reads this value
/// and proposes updates; persisting the result is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub status: DeliveryStatus,
    /// Set when the courier picks the donation up
    pub pickup_time: Option<DateTime<Utc>>,
    /// Set when the donation reaches the receiver
    pub delivery_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub donation_id: String,
    pub request_id: String,
    #[serde(default)]
    pub courier_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Donation details joined onto a delivery for routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationInfo {
    pub title: String,
    pub pickup_location: String,
    #[serde(default)]
    pub pickup_coordinate: Option<Coordinate>,
}

/// Contact card for a donor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Receiver profile joined onto a delivery for routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverInfo {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

/// An in-flight delivery aggregate as supplied by the data-access layer.
///
/// `donation` or `receiver` may be missing when the referenced row no longer
/// resolves; stop extraction treats that as caller data to skip, not an
/// engine fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveDelivery {
    pub id: String,
    #[serde(default)]
    pub donation: Option<DonationInfo>,
    #[serde(default)]
    pub receiver: Option<ReceiverInfo>,
    #[serde(default)]
    pub donor: Option<ContactInfo>,
}
