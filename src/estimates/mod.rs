pub mod estimates_model;
pub mod estimates_service;

pub use estimates_model::{Estimate, EstimateSummary, NewEstimate};
pub use estimates_service::EstimateService;
