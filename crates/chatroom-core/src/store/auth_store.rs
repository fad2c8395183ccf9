use std::sync::Arc;

use super::error::{Result, StoreError};
use super::kv::{self, KeyValueStore};
use crate::constants::keys;
use crate::models::Identity;

/// Holds the locally "logged in" identity. There is no verification; the
/// identity only gates which screens a front end shows.
pub struct AuthStore {
    bridge: Arc<dyn KeyValueStore>,
    identity: Option<Identity>,
}

impl AuthStore {
    /// Restore the saved identity. Incomplete or unreadable records are ignored.
    pub fn load(bridge: Arc<dyn KeyValueStore>) -> Self {
        let identity = kv::read_json::<Identity>(bridge.as_ref(), keys::AUTH)
            .filter(Identity::is_complete);
        Self { bridge, identity }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn login(&mut self, phone_number: &str, country_code: &str) -> Result<&Identity> {
        let identity = Identity::new(phone_number.trim(), country_code.trim());
        if !identity.is_complete() {
            return Err(StoreError::Validation(
                "phone number and country code are required".to_string(),
            ));
        }

        if let Err(e) = kv::write_json(self.bridge.as_ref(), keys::AUTH, &identity) {
            tracing::warn!(error = %e, "failed to persist identity");
        }
        tracing::info!(country_code = %identity.country_code, "logged in");
        Ok(&*self.identity.insert(identity))
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.bridge.remove(keys::AUTH) {
            tracing::warn!(error = %e, "failed to remove persisted identity");
        }
        if self.identity.take().is_some() {
            tracing::info!("logged out");
        }
    }
}
