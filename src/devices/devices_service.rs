use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::devices::devices_model::{Device, NewDevice};
use crate::errors::{Result, ValidationError};
use crate::store::DataStore;

pub struct DeviceService {
    store: Arc<DataStore>,
}

impl DeviceService {
    pub fn new(store: Arc<DataStore>) -> Self {
        DeviceService { store }
    }

    /// Register a device for push delivery. Registering an existing token
    /// replaces its record in place, so tokens stay unique.
    pub fn register_device(&self, new_device: NewDevice) -> Result<Device> {
        if new_device.token.trim().is_empty() {
            return Err(ValidationError::MissingField("token".to_string()).into());
        }
        if new_device.platform.trim().is_empty() {
            return Err(ValidationError::MissingField("platform".to_string()).into());
        }

        let device = Device {
            token: new_device.token,
            platform: new_device.platform,
            bundle_id: new_device.bundle_id,
            registered_at: Utc::now(),
        };

        self.store.mutate(|data| {
            match data.devices.iter_mut().find(|d| d.token == device.token) {
                Some(existing) => *existing = device.clone(),
                None => data.devices.push(device.clone()),
            }
        });

        debug!("registered {} device {}", device.platform, device.token);
        Ok(device)
    }

    pub fn list_devices(&self) -> Vec<Device> {
        self.store.read(|data| data.devices.clone())
    }
}
