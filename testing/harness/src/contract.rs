// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use ee_shared::{value, Status, Value, METHOD_FALLBACK};

use crate::error::{ExecutionError, Result};
use crate::frame::Frame;

/// Contract code the service manager can run. Registered under a code identifier and shared by
/// every contract deployed from it, so per-contract state lives in storage, not in `self`.
pub trait Contract: Send + Sync {
    /// Runs `method`. Unknown methods should fail with [`ExecutionError::method_not_found`].
    fn invoke(&self, frame: &mut Frame<'_>, method: &str, params: &[Value]) -> Result<Value>;

    /// Whether `method` accepts value.
    fn is_payable(&self, method: &str) -> bool {
        method == METHOD_FALLBACK
    }
}

/// Converts the parameter at `idx`, failing with `INVALID_PARAMETER` when it is missing or of
/// the wrong type.
pub fn param<'a, T>(params: &'a [Value], idx: usize) -> Result<T>
where
    T: TryFrom<&'a Value, Error = value::Error>,
{
    let v = params.get(idx).ok_or_else(|| {
        ExecutionError::failure(Status::INVALID_PARAMETER, format!("missing parameter {idx}"))
    })?;
    Ok(T::try_from(v)?)
}
