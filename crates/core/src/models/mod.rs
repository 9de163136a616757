pub mod chart;
pub mod company;
pub mod dataset;
pub mod event;
pub mod metrics;
pub mod price;
pub mod settings;
