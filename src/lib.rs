pub mod store;

pub mod contractor;
pub mod devices;
pub mod estimates;
pub mod notifications;
pub mod views;

pub mod constants;
pub mod errors;

pub use store::*;
pub use views::*;
