pub mod views_model;
pub mod views_service;

pub use views_model::{RecordedView, View, ViewMetadata, ViewStatEntry, ViewStats};
pub use views_service::ViewTrackerService;
