// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::collections::BTreeMap;

use ee_shared::{Address, Amount, CodeState, Value};

/// Keys of the invocation metadata map.
pub mod info {
    pub const BLOCK_HEIGHT: &str = "B.height";
    pub const BLOCK_TIMESTAMP: &str = "B.timestamp";
    pub const TX_INDEX: &str = "T.index";
    pub const TX_HASH: &str = "T.hash";
    pub const TX_TIMESTAMP: &str = "T.timestamp";
    pub const TX_NONCE: &str = "T.nonce";
    pub const TX_FROM: &str = "T.from";
    pub const REVISION: &str = "C.revision";
    pub const STEP_COSTS: &str = "C.stepCosts";
}

/// Everything needed to run one method of one contract: what to run, who pays for it, how much
/// it may cost, and the execution context it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Identifier of the contract code to run.
    pub code: String,
    pub is_read_only: bool,
    pub from: Address,
    pub to: Address,
    pub value: Amount,
    pub step_limit: i64,
    pub method: String,
    pub params: Vec<Value>,
    pub info: BTreeMap<String, Value>,
    /// Opaque identifier of the calling context.
    pub cid: Vec<u8>,
    /// Execution id, unique within a service manager.
    pub eid: i32,
    /// State left by the contract's previous execution, if any.
    pub code_state: Option<CodeState>,
}

impl Invocation {
    /// An invocation with empty metadata and no code state.
    pub fn new(
        code: impl Into<String>,
        from: Address,
        to: Address,
        method: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        Self {
            code: code.into(),
            is_read_only: false,
            from,
            to,
            value: Amount::default(),
            step_limit: 0,
            method: method.into(),
            params,
            info: BTreeMap::new(),
            cid: Vec::new(),
            eid: 0,
            code_state: None,
        }
    }

    pub fn read_only(mut self, is_read_only: bool) -> Self {
        self.is_read_only = is_read_only;
        self
    }

    pub fn value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    pub fn step_limit(mut self, step_limit: i64) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn info(mut self, info: BTreeMap<String, Value>) -> Self {
        self.info = info;
        self
    }

    pub fn cid(mut self, cid: Vec<u8>) -> Self {
        self.cid = cid;
        self
    }

    pub fn eid(mut self, eid: i32) -> Self {
        self.eid = eid;
        self
    }

    pub fn code_state(mut self, code_state: Option<CodeState>) -> Self {
        self.code_state = code_state;
        self
    }

    /// Integer metadata entry, if present and in range.
    pub fn info_i64(&self, key: &str) -> Option<i64> {
        self.info.get(key).and_then(|v| i64::try_from(v).ok())
    }

    /// Total size of the params, as charged for input.
    pub fn input_len(&self) -> usize {
        self.params.iter().map(Value::encoded_len).sum()
    }
}
