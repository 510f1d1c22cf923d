pub mod chart;
pub mod daily;
pub mod metrics;
pub mod preferences;
pub mod query;
pub mod settings;
pub mod summary;
