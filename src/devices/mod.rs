pub mod devices_model;
pub mod devices_service;

pub use devices_model::{Device, NewDevice};
pub use devices_service::DeviceService;
