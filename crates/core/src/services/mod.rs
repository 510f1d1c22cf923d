pub mod axis_service;
pub mod chart_service;
pub mod preference_service;
pub mod summary_service;
pub mod transform_service;
