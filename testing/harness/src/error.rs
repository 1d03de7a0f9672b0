// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::io;

use ee_shared::{value, InvokeResult, Status};

/// Execution result.
pub type Result<T> = std::result::Result<T, ExecutionError>;

/// A recorded, non-fatal failure of an invocation. It becomes the status and message of a
/// failed [`InvokeResult`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{status:?}: {message}")]
pub struct Failure {
    pub status: Status,
    pub message: String,
}

impl Failure {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExecutionError {
    #[error("{0}")]
    Failure(#[from] Failure),
    /// The invocation could not be carried to or from the engine. Never turned into a result.
    #[error("transport failure: {0}")]
    Io(#[from] io::Error),
}

impl ExecutionError {
    pub fn failure(status: Status, message: impl Into<String>) -> Self {
        ExecutionError::Failure(Failure::new(status, message))
    }

    /// A contract-defined revert with the given user code.
    pub fn revert(code: u32, message: impl Into<String>) -> Self {
        Self::failure(Status::user(code), message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::failure(Status::METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    pub(crate) fn out_of_step(name: &str) -> Self {
        Self::failure(Status::OUT_OF_STEP, format!("out of step: {name}"))
    }

    pub(crate) fn access_denied(what: &str) -> Self {
        Self::failure(Status::ACCESS_DENIED, format!("{what} in read-only context"))
    }

    /// Status of a recorded failure; `None` for transport failures.
    pub fn status(&self) -> Option<Status> {
        match self {
            ExecutionError::Failure(f) => Some(f.status),
            ExecutionError::Io(_) => None,
        }
    }
}

impl From<value::Error> for ExecutionError {
    fn from(e: value::Error) -> Self {
        ExecutionError::failure(Status::INVALID_PARAMETER, e.to_string())
    }
}

/// Errors raised while setting up the harness.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no code registered as {0:?}")]
    UnknownCode(String),
    #[error("deployment of {code:?} failed: {result:?}")]
    DeployFailed { code: String, result: InvokeResult },
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
