//! Converts active delivery aggregates into discrete route stops.

use crate::models::{ActiveDelivery, Stop, StopKind};

/// Turn a list of in-flight deliveries into pickup/dropoff stops.
///
/// Each delivery with a resolvable donation yields a pickup stop; when a
/// receiver is present it also yields the matching dropoff, immediately
/// after its pickup. Emission order follows input order so results are
/// reproducible; the optimizer re-orders afterwards.
///
/// Deliveries whose donation no longer resolves are skipped: a dangling
/// reference is a caller-data problem, not an engine fault.
pub fn extract_stops(deliveries: &[ActiveDelivery]) -> Vec<Stop> {
    let mut stops = Vec::new();

    for delivery in deliveries {
        let Some(donation) = &delivery.donation else {
            tracing::debug!(delivery_id = %delivery.id, "skipping delivery with unresolved donation");
            continue;
        };

        stops.push(Stop {
            id: format!("pickup-{}", delivery.id),
            kind: StopKind::Pickup,
            delivery_id: delivery.id.clone(),
            subject_title: donation.title.clone(),
            address: donation.pickup_location.clone(),
            coordinate: donation.pickup_coordinate,
            contact_name: delivery
                .donor
                .as_ref()
                .map(|donor| donor.full_name.clone())
                .unwrap_or_else(|| "Donor".to_string()),
            contact_phone: delivery.donor.as_ref().and_then(|donor| donor.phone.clone()),
        });

        if let Some(receiver) = &delivery.receiver {
            stops.push(Stop {
                id: format!("dropoff-{}", delivery.id),
                kind: StopKind::Dropoff,
                delivery_id: delivery.id.clone(),
                subject_title: donation.title.clone(),
                address: receiver
                    .address
                    .clone()
                    .unwrap_or_else(|| "Address not specified".to_string()),
                coordinate: receiver.coordinate,
                contact_name: receiver.full_name.clone(),
                contact_phone: receiver.phone.clone(),
            });
        }
    }

    stops
}
