//! # Configuration
//!
//! Describes an economy as data: which resources exist, which systems convert them,
//! and how the run loop is paced. Loaded from JSON with `serde_json`.
//!
//! ```json
//! {
//!   "resources": [
//!     { "name": "ore", "amount": 0, "max_capacity": 50 },
//!     { "name": "ingot", "amount": 0, "max_capacity": 20 }
//!   ],
//!   "systems": [
//!     {
//!       "name": "mine",
//!       "produces": { "resource": "ore", "amount": 3 },
//!       "processing_time_ms": 200
//!     },
//!     {
//!       "name": "smelter",
//!       "consumes": { "resource": "ore", "amount": 5 },
//!       "produces": { "resource": "ingot", "amount": 2 },
//!       "processing_time_ms": 300
//!     }
//!   ],
//!   "timing": { "pacing_ms": 100, "backoff_ms": 500 },
//!   "run_ms": 3000
//! }
//! ```

use crate::lifecycle::error::ConfigError;
use crate::system::{CycleTiming, SystemStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    #[serde(default)]
    pub amount: u32,
    pub max_capacity: u32,
}

/// `amount` units of the resource called `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountConfig {
    pub resource: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,
    #[serde(default)]
    pub consumes: Option<AmountConfig>,
    #[serde(default)]
    pub produces: Option<AmountConfig>,
    #[serde(default)]
    pub processing_time_ms: u64,
    #[serde(default)]
    pub status: SystemStatus,
}

impl SystemConfig {
    pub fn processing_time(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause at the end of every cycle.
    pub pacing_ms: u64,
    /// Extra pause after a failed step.
    pub backoff_ms: u64,
    /// How often the event consumer polls the queue.
    pub event_poll_ms: u64,
}

impl TimingConfig {
    pub fn cycle_timing(&self) -> CycleTiming {
        CycleTiming::new(
            Duration::from_millis(self.pacing_ms),
            Duration::from_millis(self.backoff_ms),
        )
    }

    pub fn event_poll(&self) -> Duration {
        Duration::from_millis(self.event_poll_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 100,
            backoff_ms: 500,
            event_poll_ms: 50,
        }
    }
}

fn default_run_ms() -> u64 {
    3_000
}

/// The full description of an economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionConfig {
    pub resources: Vec<ResourceConfig>,
    pub systems: Vec<SystemConfig>,
    #[serde(default)]
    pub timing: TimingConfig,
    /// How long the demo driver lets the economy run.
    #[serde(default = "default_run_ms")]
    pub run_ms: u64,
}

impl ProductionConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }

    /// Checks names and references before anything is built.
    ///
    /// Rejects duplicate resource or system names, references to undeclared
    /// resources, and resources that start above their capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut resources = HashSet::new();
        for resource in &self.resources {
            if !resources.insert(resource.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate resource '{}'",
                    resource.name
                )));
            }
            if resource.amount > resource.max_capacity {
                return Err(ConfigError::Invalid(format!(
                    "resource '{}' starts at {} above its capacity {}",
                    resource.name, resource.amount, resource.max_capacity
                )));
            }
        }

        let mut systems = HashSet::new();
        for system in &self.systems {
            if !systems.insert(system.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate system '{}'",
                    system.name
                )));
            }
            for rule in system.consumes.iter().chain(system.produces.iter()) {
                if !resources.contains(rule.resource.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "system '{}' references unknown resource '{}'",
                        system.name, rule.resource
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for ProductionConfig {
    /// A three-stage chain: mine → ore → smelter → ingot → forge → tool.
    fn default() -> Self {
        let amount = |resource: &str, amount| {
            Some(AmountConfig {
                resource: resource.to_string(),
                amount,
            })
        };
        Self {
            resources: vec![
                ResourceConfig {
                    name: "ore".into(),
                    amount: 10,
                    max_capacity: 50,
                },
                ResourceConfig {
                    name: "ingot".into(),
                    amount: 0,
                    max_capacity: 20,
                },
                ResourceConfig {
                    name: "tool".into(),
                    amount: 0,
                    max_capacity: 5,
                },
            ],
            systems: vec![
                SystemConfig {
                    name: "mine".into(),
                    consumes: None,
                    produces: amount("ore", 3),
                    processing_time_ms: 200,
                    status: SystemStatus::Standard,
                },
                SystemConfig {
                    name: "smelter".into(),
                    consumes: amount("ore", 5),
                    produces: amount("ingot", 2),
                    processing_time_ms: 300,
                    status: SystemStatus::Standard,
                },
                SystemConfig {
                    name: "forge".into(),
                    consumes: amount("ingot", 3),
                    produces: amount("tool", 1),
                    processing_time_ms: 500,
                    status: SystemStatus::Standard,
                },
            ],
            timing: TimingConfig::default(),
            run_ms: default_run_ms(),
        }
    }
}
