//! Chain configuration

use serde::{Deserialize, Serialize};

use crate::constants::{COINBASE_REWARD, CUTOFF_AGE};
use crate::error::{ConsensusError, Result};
use crate::types::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Blocks whose height would be `<= best_height - cutoff_age` are rejected.
    pub cutoff_age: u64,
    /// Coinbase value paid by blocks assembled through this chain.
    pub coinbase_reward: Amount,
    /// Drop nodes that can no longer be extended.
    pub prune_stale: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            cutoff_age: CUTOFF_AGE,
            coinbase_reward: COINBASE_REWARD,
            prune_stale: true,
        }
    }
}

impl ChainConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cutoff_age == 0 {
            return Err(ConsensusError::InvalidConfig(
                "cutoff_age must be positive".to_string(),
            ));
        }
        if self.coinbase_reward < 0 {
            return Err(ConsensusError::InvalidConfig(format!(
                "coinbase_reward must be non-negative, got {}",
                self.coinbase_reward
            )));
        }
        Ok(())
    }
}
