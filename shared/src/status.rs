// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::fmt;

use serde::{Deserialize, Serialize};

/// Status reported for an invocation. Codes below [`Status::USER_BASE`] are reserved for the
/// engine, codes from there up to [`Status::LIMIT`] are contract-defined reverts.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(u32);

impl Status {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// A user revert with the given contract-defined code. Codes beyond the limit saturate.
    pub fn user(code: u32) -> Self {
        Self(Self::USER_BASE.0.saturating_add(code).min(Self::LIMIT.0))
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_user(self) -> bool {
        self.0 >= Self::USER_BASE.0
    }

    /// The contract-defined code of a user revert.
    pub fn user_code(self) -> Option<u32> {
        self.is_user().then(|| self.0 - Self::USER_BASE.0)
    }
}

impl Status {
    pub const SUCCESS: Status = Status::new(0);
    pub const UNKNOWN_FAILURE: Status = Status::new(1);
    pub const CONTRACT_NOT_FOUND: Status = Status::new(2);
    pub const METHOD_NOT_FOUND: Status = Status::new(3);
    pub const METHOD_NOT_PAYABLE: Status = Status::new(4);
    pub const ILLEGAL_FORMAT: Status = Status::new(5);
    pub const INVALID_PARAMETER: Status = Status::new(6);
    pub const INVALID_INSTANCE: Status = Status::new(7);
    pub const INVALID_CONTAINER_ACCESS: Status = Status::new(8);
    pub const ACCESS_DENIED: Status = Status::new(9);
    pub const OUT_OF_STEP: Status = Status::new(10);
    pub const OUT_OF_BALANCE: Status = Status::new(11);
    pub const TIMEOUT: Status = Status::new(12);
    pub const STACK_OVERFLOW: Status = Status::new(13);
    pub const SKIP_TRANSACTION: Status = Status::new(14);
    pub const INVALID_PACKAGE: Status = Status::new(15);

    pub const USER_BASE: Status = Status::new(32);
    pub const LIMIT: Status = Status::new(999);
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::SUCCESS => "Success",
            Self::UNKNOWN_FAILURE => "UnknownFailure",
            Self::CONTRACT_NOT_FOUND => "ContractNotFound",
            Self::METHOD_NOT_FOUND => "MethodNotFound",
            Self::METHOD_NOT_PAYABLE => "MethodNotPayable",
            Self::ILLEGAL_FORMAT => "IllegalFormat",
            Self::INVALID_PARAMETER => "InvalidParameter",
            Self::INVALID_INSTANCE => "InvalidInstance",
            Self::INVALID_CONTAINER_ACCESS => "InvalidContainerAccess",
            Self::ACCESS_DENIED => "AccessDenied",
            Self::OUT_OF_STEP => "OutOfStep",
            Self::OUT_OF_BALANCE => "OutOfBalance",
            Self::TIMEOUT => "Timeout",
            Self::STACK_OVERFLOW => "StackOverflow",
            Self::SKIP_TRANSACTION => "SkipTransaction",
            Self::INVALID_PACKAGE => "InvalidPackage",
            s if s.is_user() => return write!(f, "User({})", s.0 - Self::USER_BASE.0),
            s => return write!(f, "Status({})", s.0),
        };
        f.write_str(name)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status: {}", self.0)
    }
}
