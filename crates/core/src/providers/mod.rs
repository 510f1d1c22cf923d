pub mod traits;

// Provider implementations
pub mod analytics_api;
