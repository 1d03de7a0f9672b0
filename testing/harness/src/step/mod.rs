// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
pub use self::charge::StepCharge;
pub use self::costs::StepCosts;
use crate::error::{ExecutionError, Result};

mod charge;
mod costs;

/// Meters the steps consumed by a single invocation against its step limit.
#[derive(Debug, Clone)]
pub struct StepTracker {
    step_limit: i64,
    step_used: i64,
}

impl StepTracker {
    pub fn new(step_limit: i64) -> Self {
        Self {
            step_limit: step_limit.max(0),
            step_used: 0,
        }
    }

    /// Consumes steps, failing with `OUT_OF_STEP` once the limit is exceeded. An exhausted
    /// tracker reports the whole limit as used.
    pub fn charge(&mut self, charge: StepCharge) -> Result<()> {
        match self.step_used.checked_add(charge.steps) {
            None => {
                log::trace!("step overflow: {}", charge.name);
                self.step_used = self.step_limit;
                Err(ExecutionError::out_of_step(charge.name))
            }
            Some(used) if used > self.step_limit => {
                log::trace!("out of step: {}", charge.name);
                self.step_used = self.step_limit;
                Err(ExecutionError::out_of_step(charge.name))
            }
            Some(used) => {
                log::trace!("charged {} steps: {}", charge.steps, charge.name);
                self.step_used = used.max(0);
                Ok(())
            }
        }
    }

    pub fn step_limit(&self) -> i64 {
        self.step_limit
    }

    pub fn step_used(&self) -> i64 {
        self.step_used
    }

    pub fn steps_left(&self) -> i64 {
        self.step_limit - self.step_used
    }
}
