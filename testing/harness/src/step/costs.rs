// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::collections::BTreeMap;

use ee_shared::Value;
use serde::{Deserialize, Serialize};

use super::StepCharge;

/// The step cost table. Per-byte entries are multiplied by the size of the data involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepCosts {
    /// Base cost of a top-level transaction.
    pub default: i64,
    pub contract_call: i64,
    /// Base cost of deploying a contract.
    pub contract_create: i64,
    pub contract_update: i64,
    /// Per byte of deployed code.
    pub contract_set: i64,
    /// Per byte read from storage.
    pub get: i64,
    /// Per byte written under a new key.
    pub set: i64,
    /// Per byte written over an existing key.
    pub replace: i64,
    /// Per byte removed; negative, so deleting refunds steps.
    pub delete: i64,
    /// Per byte of invocation params.
    pub input: i64,
    /// Per byte of event data.
    pub event_log: i64,
    pub api_call: i64,
}

impl Default for StepCosts {
    fn default() -> Self {
        Self {
            default: 100_000,
            contract_call: 25_000,
            contract_create: 1_000_000_000,
            contract_update: 1_600_000_000,
            contract_set: 30_000,
            get: 0,
            set: 320,
            replace: 80,
            delete: -240,
            input: 200,
            event_log: 100,
            api_call: 10_000,
        }
    }
}

/// `cost * size`, saturating so that an oversized charge still exhausts the step limit.
fn per_byte(cost: i64, size: usize) -> i64 {
    match i64::try_from(size) {
        Ok(size) => cost.saturating_mul(size),
        Err(_) => cost.signum().saturating_mul(i64::MAX),
    }
}

impl StepCosts {
    #[inline]
    pub fn on_transaction(&self) -> StepCharge<'static> {
        StepCharge::new("Default", self.default)
    }

    #[inline]
    pub fn on_contract_call(&self) -> StepCharge<'static> {
        StepCharge::new("ContractCall", self.contract_call)
    }

    #[inline]
    pub fn on_contract_create(&self) -> StepCharge<'static> {
        StepCharge::new("ContractCreate", self.contract_create)
    }

    #[inline]
    pub fn on_contract_set(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("ContractSet", per_byte(self.contract_set, size))
    }

    #[inline]
    pub fn on_input(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("Input", per_byte(self.input, size))
    }

    #[inline]
    pub fn on_get(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("Get", per_byte(self.get, size))
    }

    #[inline]
    pub fn on_set(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("Set", per_byte(self.set, size))
    }

    #[inline]
    pub fn on_replace(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("Replace", per_byte(self.replace, size))
    }

    #[inline]
    pub fn on_delete(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("Delete", per_byte(self.delete, size))
    }

    #[inline]
    pub fn on_event_log(&self, size: usize) -> StepCharge<'static> {
        StepCharge::new("EventLog", per_byte(self.event_log, size))
    }

    #[inline]
    pub fn on_api_call(&self) -> StepCharge<'static> {
        StepCharge::new("ApiCall", self.api_call)
    }

    /// The table as handed to contracts in the `C.stepCosts` metadata entry.
    pub fn to_value(&self) -> Value {
        let entries = [
            ("default", self.default),
            ("contractCall", self.contract_call),
            ("contractCreate", self.contract_create),
            ("contractUpdate", self.contract_update),
            ("contractSet", self.contract_set),
            ("get", self.get),
            ("set", self.set),
            ("replace", self.replace),
            ("delete", self.delete),
            ("input", self.input),
            ("eventLog", self.event_log),
            ("apiCall", self.api_call),
        ];
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::from(v)))
                .collect::<BTreeMap<_, _>>(),
        )
    }
}
