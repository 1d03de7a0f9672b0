// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use serde::Serialize;

use crate::address::Address;
use crate::value::Value;

/// An event emitted by a contract, stamped with the emitting address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLog {
    pub emitter: Address,
    /// Indexed values; the first one is the event signature, e.g. `Transfer(Address,Address,int)`.
    pub indexed: Vec<Value>,
    pub data: Vec<Value>,
}

impl EventLog {
    pub fn new(emitter: Address, indexed: Vec<Value>, data: Vec<Value>) -> Self {
        Self {
            emitter,
            indexed,
            data,
        }
    }

    pub fn signature(&self) -> Option<&str> {
        match self.indexed.first() {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Bytes charged when the event is logged.
    pub fn encoded_len(&self) -> usize {
        self.indexed
            .iter()
            .chain(self.data.iter())
            .map(Value::encoded_len)
            .sum()
    }
}
