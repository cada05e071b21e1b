pub mod contractor_model;
pub mod contractor_service;

pub use contractor_model::{Contractor, NewContractor};
pub use contractor_service::ContractorService;
