//! In-memory state store using DashMap.

use crate::config::Config;
use dashmap::DashMap;
use foodshare_core::{
    apply_transition, ActiveDelivery, ContactInfo, Delivery, DeliveryStatus, DonationInfo,
    ReceiverInfo, TransitionError,
};
use foodshare_notify::{NotifyClient, StatusNotification};

/// A delivery together with the joined records routing and notifications
/// need. The durable copy lives in the backing store; this is the server's
/// working set.
#[derive(Debug, Clone)]
pub struct StoredDelivery {
    pub delivery: Delivery,
    pub donation: Option<DonationInfo>,
    pub receiver: Option<ReceiverInfo>,
    pub donor: Option<ContactInfo>,
    pub receiver_email: Option<String>,
}

/// Outcome of a store-level transition request.
pub enum TransitionResult {
    /// Committed; the notification is `None` when the receiver has no
    /// email on file.
    Applied {
        delivery: Delivery,
        notification: Option<StatusNotification>,
    },
    NotFound,
    Rejected(TransitionError),
}

/// Application state - thread-safe store for deliveries.
pub struct AppState {
    deliveries: DashMap<String, StoredDelivery>,
    notifier: NotifyClient,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let notifier = NotifyClient::new(config.notify_url.clone(), config.notify_api_key.clone());
        Self {
            deliveries: DashMap::new(),
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notifier(&self) -> &NotifyClient {
        &self.notifier
    }

    pub fn insert_delivery(&self, stored: StoredDelivery) {
        self.deliveries.insert(stored.delivery.id.clone(), stored);
    }

    pub fn get_delivery(&self, id: &str) -> Option<Delivery> {
        self.deliveries.get(id).map(|entry| entry.delivery.clone())
    }

    /// All deliveries, newest first, optionally filtered by courier.
    pub fn list_deliveries(&self, courier_id: Option<&str>) -> Vec<Delivery> {
        let mut deliveries: Vec<Delivery> = self
            .deliveries
            .iter()
            .filter(|entry| match courier_id {
                Some(courier) => entry.delivery.courier_id.as_deref() == Some(courier),
                None => true,
            })
            .map(|entry| entry.delivery.clone())
            .collect();
        deliveries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        deliveries
    }

    /// Aggregates for every non-terminal delivery, in creation order, for
    /// route planning.
    pub fn active_aggregates(&self, courier_id: Option<&str>) -> Vec<ActiveDelivery> {
        let mut active: Vec<(chrono::DateTime<chrono::Utc>, ActiveDelivery)> = self
            .deliveries
            .iter()
            .filter(|entry| !entry.delivery.status.is_terminal())
            .filter(|entry| match courier_id {
                Some(courier) => entry.delivery.courier_id.as_deref() == Some(courier),
                None => true,
            })
            .map(|entry| {
                (
                    entry.delivery.created_at,
                    ActiveDelivery {
                        id: entry.delivery.id.clone(),
                        donation: entry.donation.clone(),
                        receiver: entry.receiver.clone(),
                        donor: entry.donor.clone(),
                    },
                )
            })
            .collect();
        active.sort_by(|a, b| a.0.cmp(&b.0));
        active.into_iter().map(|(_, aggregate)| aggregate).collect()
    }

    /// Apply a status transition under the map's entry lock.
    ///
    /// Holding the entry for the whole validate-and-write keeps concurrent
    /// requests for the same delivery id serialized: the second request
    /// validates against the committed status, not the stale one.
    pub fn transition(&self, id: &str, target: DeliveryStatus) -> TransitionResult {
        let Some(mut entry) = self.deliveries.get_mut(id) else {
            return TransitionResult::NotFound;
        };

        match apply_transition(&entry.delivery, target) {
            Ok(outcome) => {
                entry.delivery = outcome.delivery.clone();
                let notification =
                    entry
                        .receiver_email
                        .as_ref()
                        .map(|email| StatusNotification {
                            delivery_id: outcome.notification.delivery_id.clone(),
                            new_status: outcome.notification.status,
                            subject_title: entry
                                .donation
                                .as_ref()
                                .map(|donation| donation.title.clone())
                                .unwrap_or_else(|| "Food Donation".to_string()),
                            recipient_email: email.clone(),
                            recipient_name: entry
                                .receiver
                                .as_ref()
                                .map(|receiver| receiver.full_name.clone())
                                .unwrap_or_else(|| "Valued User".to_string()),
                        });
                TransitionResult::Applied {
                    delivery: outcome.delivery,
                    notification,
                }
            }
            Err(err) => TransitionResult::Rejected(err),
        }
    }
}
