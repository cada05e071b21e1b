use std::sync::Arc;

use chrono::Utc;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::contractor::contractor_model::{Contractor, NewContractor};
use crate::errors::{Result, ValidationError};
use crate::store::DataStore;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub struct ContractorService {
    store: Arc<DataStore>,
}

impl ContractorService {
    pub fn new(store: Arc<DataStore>) -> Self {
        ContractorService { store }
    }

    /// Register the contractor, replacing any prior record wholesale.
    pub fn register_contractor(&self, new_contractor: NewContractor) -> Result<Contractor> {
        let email = new_contractor.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email".to_string()).into());
        }
        if !EMAIL_REGEX.is_match(email) {
            return Err(ValidationError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            ))
            .into());
        }

        let contractor = Contractor {
            email: email.to_string(),
            name: new_contractor.name,
            company_name: new_contractor.company_name,
            registered_at: Utc::now(),
        };

        self.store.mutate(|data| {
            data.contractor = Some(contractor.clone());
        });

        debug!("registered contractor {}", contractor.email);
        Ok(contractor)
    }

    pub fn get_contractor(&self) -> Option<Contractor> {
        self.store.read(|data| data.contractor.clone())
    }
}
