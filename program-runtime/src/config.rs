//! Runtime configuration

use crate::gas::{Gas, GasSchedule};
use serde::{Deserialize, Serialize};

/// Default gas limit for a top-level call
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

/// Largest gas limit a top-level call may request
pub const MAX_GAS_LIMIT: u64 = 30_000_000;

/// Limits and costs an interpreter applies to the frames it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Deepest allowed nesting of frames
    pub max_call_depth: usize,
    /// Largest code a creation frame may deposit, in bytes
    pub max_code_size: usize,
    /// Gas price used when a transaction does not set one
    pub default_gas_price: u64,
    /// Gas costs
    pub gas_schedule: GasSchedule,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1024,
            max_code_size: 24_576,
            default_gas_price: 1,
            gas_schedule: GasSchedule::default(),
        }
    }
}

impl RuntimeConfig {
    /// Default gas price as a [`Gas`] value
    pub fn gas_price(&self) -> Gas {
        Gas::from(self.default_gas_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_call_depth, 1024);
        assert_eq!(config.max_code_size, 24_576);
        assert_eq!(config.gas_price(), Gas::from(1u32));
        assert_eq!(config.gas_schedule, GasSchedule::default());
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: RuntimeConfig = serde_json::from_str(
            r#"{"max_call_depth": 8, "gas_schedule": {"call": 40}}"#,
        )
        .unwrap();
        assert_eq!(config.max_call_depth, 8);
        assert_eq!(config.max_code_size, 24_576);
        assert_eq!(config.gas_schedule.call, 40);
        assert_eq!(config.gas_schedule.step, 1);
    }
}
