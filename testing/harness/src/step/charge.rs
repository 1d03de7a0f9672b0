// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT

/// A single step charge, named after the operation it pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCharge<'a> {
    pub name: &'a str,
    /// Steps to consume. Negative values are refunds.
    pub steps: i64,
}

impl<'a> StepCharge<'a> {
    pub fn new(name: &'a str, steps: i64) -> Self {
        Self { name, steps }
    }
}
