// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT

/// Per-contract state left behind by the previous execution. Engines use it to decide whether
/// cached contract objects are still valid; the harness only carries and advances it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CodeState {
    pub next_hash: i32,
    pub object_graph_hash: Vec<u8>,
    pub prev_eid: i32,
}

impl CodeState {
    pub fn new(next_hash: i32, object_graph_hash: Vec<u8>, prev_eid: i32) -> Self {
        Self {
            next_hash,
            object_graph_hash,
            prev_eid,
        }
    }

    /// The state following a successful writing execution `eid` that left the contract's
    /// storage hashing to `object_graph_hash`.
    pub fn advance(&self, object_graph_hash: Vec<u8>, eid: i32) -> Self {
        Self {
            next_hash: self.next_hash.wrapping_add(1),
            object_graph_hash,
            prev_eid: eid,
        }
    }
}
