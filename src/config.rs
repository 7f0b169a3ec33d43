//! Run configuration
//!
//! Id base, sequence restart floor and insert batch size used to be global
//! constants. They are carried explicitly so that tests and runs can vary them.

use crate::credentials::CredentialHasher;
use crate::error::{Result, SeedError};

/// Ids 1..=DEFAULT_START_INDEX are left to pre-existing data
pub const DEFAULT_START_INDEX: i64 = 100;
pub const DEFAULT_END_INDEX: i64 = 1000;
pub const DEFAULT_MAX_INSERT: usize = 10_000;

/// Name of the generated script inside the seed folder
pub const OUTPUT_FILE: &str = "init.js";

#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// First seeded row of every table gets `start_index + 1`
    pub start_index: i64,
    /// Lowest value sequences are restarted at
    pub end_index: i64,
    /// Maximum rows per insert statement
    pub max_insert: usize,
    pub hasher: CredentialHasher,
}

impl SeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_insert == 0 {
            return Err(SeedError::InvalidConfig(
                "max insert batch size must be at least 1".to_string(),
            ));
        }
        if self.start_index < 0 {
            return Err(SeedError::InvalidConfig(format!(
                "start index must not be negative, got {}",
                self.start_index
            )));
        }
        Ok(())
    }

    /// Id of the first seeded user, owner of every seeded dataset, set and campaign
    pub fn owner_id(&self) -> i64 {
        self.start_index + 1
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            start_index: DEFAULT_START_INDEX,
            end_index: DEFAULT_END_INDEX,
            max_insert: DEFAULT_MAX_INSERT,
            hasher: CredentialHasher::default(),
        }
    }
}
