pub mod lifecycle;
pub mod models;
pub mod route;
pub mod spatial;
pub mod stops;

pub use lifecycle::{apply_transition, StatusChange, TransitionError, TransitionOutcome};
pub use models::{
    ActiveDelivery, ContactInfo, Coordinate, Delivery, DeliveryStatus, DonationInfo, ReceiverInfo,
    Stop, StopKind,
};
pub use route::{
    compute_metrics, optimize_route, plan_route, OrderedStops, Route, RouteMetrics, RoutePolicy,
};
pub use spatial::haversine_distance_km;
pub use stops::extract_stops;
