use soroban_sdk::{Env, panic_with_error};

use crate::common::error::Error;
use crate::common::types::{INSTANCE_BUMP, INSTANCE_TTL, LoanStorage, STORAGE};

/// Storage operations for the loan
pub struct Storage;

impl Storage {
    /// Extend instance storage TTL if needed
    pub fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL, INSTANCE_BUMP);
    }

    /// Check if the loan is initialized
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&STORAGE)
    }

    /// Get the loan state
    pub fn get(env: &Env) -> LoanStorage {
        Self::extend_instance_ttl(env);
        env.storage()
            .instance()
            .get(&STORAGE)
            .unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }

    /// Set the loan state
    pub fn set(env: &Env, loan: &LoanStorage) {
        env.storage().instance().set(&STORAGE, loan);
        Self::extend_instance_ttl(env);
    }
}
