// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use ee_shared::Address;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::step::StepCosts;

/// Address collecting transaction fees.
pub const DEFAULT_TREASURY: Address = Address::new_account([
    0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

/// Loops charged per step: 10 gloop.
pub const DEFAULT_STEP_PRICE: u64 = 10_000_000_000;

/// Tunables of a [`crate::ServiceManager`]. Every field can be omitted when loading from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub step_costs: StepCosts,
    /// Loops charged per step consumed by a transaction.
    pub step_price: u64,
    /// Deepest allowed chain of nested calls.
    pub max_call_depth: usize,
    /// Upper bound applied to every invocation's step limit.
    pub max_step_limit: i64,
    pub revision: i64,
    pub initial_height: i64,
    /// Microseconds since the epoch.
    pub initial_timestamp: i64,
    /// Microseconds between blocks.
    pub block_interval: i64,
    pub treasury: Address,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_costs: StepCosts::default(),
            step_price: DEFAULT_STEP_PRICE,
            max_call_depth: 64,
            max_step_limit: 2_500_000_000,
            revision: 0,
            initial_height: 0,
            initial_timestamp: 1_600_000_000_000_000,
            block_interval: 2_000_000,
            treasury: DEFAULT_TREASURY,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_step_costs(mut self, step_costs: StepCosts) -> Self {
        self.step_costs = step_costs;
        self
    }

    pub fn with_step_price(mut self, step_price: u64) -> Self {
        self.step_price = step_price;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_step_limit(mut self, limit: i64) -> Self {
        self.max_step_limit = limit;
        self
    }

    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }
}
