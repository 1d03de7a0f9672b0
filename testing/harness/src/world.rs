// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use anyhow::Context;
use ee_shared::{Address, Amount, CodeState, EventLog, Status};
use num_traits::Zero;

use crate::error::Failure;
use crate::journal::Journal;

/// A deployed contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInfo {
    /// Identifier of the code in the service manager's registry.
    pub code: String,
    pub owner: Address,
    pub code_state: CodeState,
}

type StorageKey = (Address, Vec<u8>);

/// The simulated ledger: balances, contracts, contract storage and emitted events. Not
/// threadsafe; all mutation goes through `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    balances: Journal<Address, Amount>,
    contracts: Journal<Address, ContractInfo>,
    storage: Journal<StorageKey, Vec<u8>>,
    events: Vec<EventLog>,
    /// Snapshot layers, one per open transaction.
    layers: Vec<SnapLayer>,
}

/// Undo-log positions at the time a transaction began.
#[derive(Debug, Clone, Copy)]
struct SnapLayer {
    balances: usize,
    contracts: usize,
    storage: usize,
    events: usize,
}

impl WorldState {
    pub fn balance(&self, addr: &Address) -> Amount {
        self.balances.get(addr).cloned().unwrap_or_default()
    }

    pub fn set_balance(&mut self, addr: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&addr);
        } else {
            self.balances.insert(addr, amount);
        }
    }

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: &Amount) -> Result<(), Failure> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance(from);
        if &available < amount {
            return Err(Failure::new(
                Status::OUT_OF_BALANCE,
                format!("{} has {} but needs {}", from, available, amount),
            ));
        }
        self.set_balance(*from, available - amount);
        let credited = self.balance(to) + amount;
        self.set_balance(*to, credited);
        Ok(())
    }

    pub fn contract(&self, addr: &Address) -> Option<&ContractInfo> {
        self.contracts.get(addr)
    }

    pub fn set_contract(&mut self, addr: Address, info: ContractInfo) {
        self.contracts.insert(addr, info);
    }

    pub fn set_code_state(&mut self, addr: &Address, code_state: CodeState) {
        if let Some(info) = self.contracts.get(addr) {
            let info = ContractInfo {
                code_state,
                ..info.clone()
            };
            self.contracts.insert(*addr, info);
        }
    }

    pub fn storage_get(&self, addr: &Address, key: &[u8]) -> Option<&[u8]> {
        self.storage
            .get(&(*addr, key.to_vec()))
            .map(Vec::as_slice)
    }

    /// Writes a storage slot, returning whether the key already existed.
    pub fn storage_set(&mut self, addr: &Address, key: &[u8], value: Vec<u8>) -> bool {
        self.storage.insert((*addr, key.to_vec()), value)
    }

    /// Removes a storage slot, returning the size of the removed value.
    pub fn storage_delete(&mut self, addr: &Address, key: &[u8]) -> Option<usize> {
        let k = (*addr, key.to_vec());
        let len = self.storage.get(&k)?.len();
        self.storage.remove(&k);
        Some(len)
    }

    /// Hash over every storage slot of a contract, in key order.
    pub fn storage_hash(&self, addr: &Address) -> Vec<u8> {
        let mut state = blake2b_simd::Params::new().hash_length(32).to_state();
        for ((_, key), value) in self
            .storage
            .range((*addr, Vec::new())..)
            .take_while(|((owner, _), _)| owner == addr)
        {
            state.update(&(key.len() as u32).to_be_bytes());
            state.update(key);
            state.update(&(value.len() as u32).to_be_bytes());
            state.update(value);
        }
        state.finalize().as_bytes().to_vec()
    }

    pub fn emit(&mut self, event: EventLog) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[EventLog] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<EventLog> {
        std::mem::take(&mut self.events)
    }

    /// Begin a new state transaction. Transactions stack.
    pub fn begin_transaction(&mut self) {
        self.layers.push(SnapLayer {
            balances: self.balances.mark(),
            contracts: self.contracts.mark(),
            storage: self.storage.mark(),
            events: self.events.len(),
        })
    }

    /// End a transaction, reverting if requested.
    pub fn end_transaction(&mut self, revert: bool) -> anyhow::Result<()> {
        let layer = self.layers.pop().context("state snapshots empty")?;
        if revert {
            self.balances.rollback(layer.balances);
            self.contracts.rollback(layer.contracts);
            self.storage.rollback(layer.storage);
            self.events.truncate(layer.events);
        }
        // When we end the last transaction, discard the undo history.
        if !self.in_transaction() {
            self.balances.forget();
            self.contracts.forget();
            self.storage.forget();
        }
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        !self.layers.is_empty()
    }
}
