pub mod data_store;
pub mod state;

pub use data_store::DataStore;
pub use state::AppData;
