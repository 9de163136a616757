pub mod chart_service;
pub mod event_service;
pub mod filter_service;
pub mod metrics_service;
