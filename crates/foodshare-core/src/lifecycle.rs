//! Delivery status lifecycle.
//!
//! The engine enforces the status lattice only; who is allowed to request a
//! given transition is the caller's concern. Callers must also serialize
//! concurrent transitions for the same delivery id, since validation reads
//! the status the caller handed in.

use crate::models::{Delivery, DeliveryStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("invalid delivery status transition: {from} -> {to}")]
    InvalidTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },
}

/// Emitted alongside a committed transition; the caller dispatches the
/// matching notification at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub delivery_id: String,
    pub status: DeliveryStatus,
}

/// The updated delivery value plus its notification signal.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub delivery: Delivery,
    pub notification: StatusChange,
}

impl DeliveryStatus {
    /// Whether the lattice permits moving from `self` to `target`.
    ///
    /// Terminal states permit nothing, and `Delivered` cannot be reached
    /// without passing through `InTransit`.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Assigned, Self::InTransit)
                | (Self::InTransit, Self::Delivered)
                | (Self::Assigned | Self::InTransit, Self::Failed)
        )
    }
}

/// Validate and apply a status transition.
///
/// Returns a new delivery value; the caller's copy is left untouched and
/// persisting the result is the caller's job. `pickup_time` /
/// `delivery_time` are stamped with the call time on the transitions that
/// set them.
pub fn apply_transition(
    delivery: &Delivery,
    target: DeliveryStatus,
) -> Result<TransitionOutcome, TransitionError> {
    if !delivery.status.can_transition_to(target) {
        return Err(TransitionError::InvalidTransition {
            from: delivery.status,
            to: target,
        });
    }

    let mut updated = delivery.clone();
    updated.status = target;
    match target {
        DeliveryStatus::InTransit => updated.pickup_time = Some(Utc::now()),
        DeliveryStatus::Delivered => updated.delivery_time = Some(Utc::now()),
        DeliveryStatus::Assigned | DeliveryStatus::Failed => {}
    }

    Ok(TransitionOutcome {
        notification: StatusChange {
            delivery_id: updated.id.clone(),
            status: target,
        },
        delivery: updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_delivery() -> Delivery {
        Delivery {
            id: "d1".to_string(),
            status: DeliveryStatus::Assigned,
            pickup_time: None,
            delivery_time: None,
            notes: None,
            donation_id: "don1".to_string(),
            request_id: "req1".to_string(),
            courier_id: Some("courier1".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn assigned_to_in_transit_stamps_pickup_time() {
        let delivery = fresh_delivery();
        let before = Utc::now();
        let outcome = apply_transition(&delivery, DeliveryStatus::InTransit).unwrap();
        let after = Utc::now();

        assert_eq!(outcome.delivery.status, DeliveryStatus::InTransit);
        let pickup = outcome.delivery.pickup_time.expect("pickup time set");
        assert!(pickup >= before && pickup <= after);
        assert_eq!(outcome.delivery.delivery_time, None);
        // caller's copy is untouched
        assert_eq!(delivery.status, DeliveryStatus::Assigned);
        assert_eq!(delivery.pickup_time, None);
    }

    #[test]
    fn full_chain_sets_both_timestamps() {
        let delivery = fresh_delivery();
        let in_transit = apply_transition(&delivery, DeliveryStatus::InTransit)
            .unwrap()
            .delivery;
        let delivered = apply_transition(&in_transit, DeliveryStatus::Delivered)
            .unwrap()
            .delivery;

        assert_eq!(delivered.status, DeliveryStatus::Delivered);
        assert!(delivered.pickup_time.is_some());
        assert!(delivered.delivery_time.is_some());

        // terminal: every further request is rejected
        for target in [
            DeliveryStatus::Assigned,
            DeliveryStatus::InTransit,
            DeliveryStatus::Delivered,
            DeliveryStatus::Failed,
        ] {
            let err = apply_transition(&delivered, target).unwrap_err();
            assert_eq!(
                err,
                TransitionError::InvalidTransition {
                    from: DeliveryStatus::Delivered,
                    to: target,
                }
            );
        }
    }

    #[test]
    fn delivered_requires_passing_through_in_transit() {
        let delivery = fresh_delivery();
        let err = apply_transition(&delivery, DeliveryStatus::Delivered).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: DeliveryStatus::Assigned,
                to: DeliveryStatus::Delivered,
            }
        );
    }

    #[test]
    fn failed_is_reachable_from_both_active_states_without_timestamps() {
        let assigned = fresh_delivery();
        let failed = apply_transition(&assigned, DeliveryStatus::Failed)
            .unwrap()
            .delivery;
        assert_eq!(failed.status, DeliveryStatus::Failed);
        assert_eq!(failed.pickup_time, None);
        assert_eq!(failed.delivery_time, None);

        let in_transit = apply_transition(&assigned, DeliveryStatus::InTransit)
            .unwrap()
            .delivery;
        let failed = apply_transition(&in_transit, DeliveryStatus::Failed)
            .unwrap()
            .delivery;
        assert_eq!(failed.status, DeliveryStatus::Failed);
        assert_eq!(failed.delivery_time, None);
    }

    #[test]
    fn failed_is_terminal() {
        let assigned = fresh_delivery();
        let failed = apply_transition(&assigned, DeliveryStatus::Failed)
            .unwrap()
            .delivery;
        assert!(apply_transition(&failed, DeliveryStatus::InTransit).is_err());
        assert!(apply_transition(&failed, DeliveryStatus::Assigned).is_err());
    }

    #[test]
    fn outcome_carries_notification_signal() {
        let delivery = fresh_delivery();
        let outcome = apply_transition(&delivery, DeliveryStatus::InTransit).unwrap();
        assert_eq!(outcome.notification.delivery_id, "d1");
        assert_eq!(outcome.notification.status, DeliveryStatus::InTransit);
    }
}
