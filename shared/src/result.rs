// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use serde::Serialize;

use crate::status::Status;
use crate::value::Value;

/// Outcome of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResult {
    pub status: Status,
    /// Steps consumed, including those of nested calls.
    pub step_used: i64,
    /// Return data on success, the failure message otherwise.
    pub ret: Value,
}

impl InvokeResult {
    pub fn success(step_used: i64, ret: Value) -> Self {
        Self {
            status: Status::SUCCESS,
            step_used,
            ret,
        }
    }

    pub fn failure(status: Status, step_used: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            step_used,
            ret: Value::Str(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
