// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use ee_shared::{Address, Amount, CodeState, EventLog, Value, METHOD_FALLBACK};

use crate::error::{ExecutionError, Result};
use crate::invocation::{info, Invocation};
use crate::service_manager::ServiceManager;
use crate::step::{StepCharge, StepTracker};

/// A contract's view of the invocation it is running: who called it, what it may spend, and
/// access to its storage, the ledger and other contracts.
///
/// Every operation that costs steps charges them before taking effect, so an `OUT_OF_STEP`
/// failure never leaves a half-applied write behind.
pub struct Frame<'a> {
    sm: &'a mut ServiceManager,
    inv: &'a Invocation,
    steps: &'a mut StepTracker,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        sm: &'a mut ServiceManager,
        inv: &'a Invocation,
        steps: &'a mut StepTracker,
    ) -> Self {
        Self { sm, inv, steps }
    }

    /// Address of the running contract.
    pub fn address(&self) -> Address {
        self.inv.to
    }

    pub fn caller(&self) -> Address {
        self.inv.from
    }

    /// Sender of the transaction that started the call chain.
    pub fn origin(&self) -> Address {
        self.inv
            .info
            .get(info::TX_FROM)
            .and_then(|v| Address::try_from(v).ok())
            .unwrap_or(self.inv.from)
    }

    pub fn owner(&self) -> Option<Address> {
        self.sm.world().contract(&self.inv.to).map(|c| c.owner)
    }

    pub fn value(&self) -> &Amount {
        &self.inv.value
    }

    pub fn method(&self) -> &str {
        &self.inv.method
    }

    pub fn is_read_only(&self) -> bool {
        self.inv.is_read_only
    }

    pub fn eid(&self) -> i32 {
        self.inv.eid
    }

    pub fn code_state(&self) -> Option<&CodeState> {
        self.inv.code_state.as_ref()
    }

    pub fn block_height(&self) -> i64 {
        self.inv.info_i64(info::BLOCK_HEIGHT).unwrap_or_default()
    }

    pub fn block_timestamp(&self) -> i64 {
        self.inv.info_i64(info::BLOCK_TIMESTAMP).unwrap_or_default()
    }

    pub fn tx_index(&self) -> i64 {
        self.inv.info_i64(info::TX_INDEX).unwrap_or_default()
    }

    pub fn tx_hash(&self) -> Option<Vec<u8>> {
        self.inv
            .info
            .get(info::TX_HASH)
            .and_then(|v| Vec::<u8>::try_from(v).ok())
    }

    pub fn steps_used(&self) -> i64 {
        self.steps.step_used()
    }

    pub fn steps_left(&self) -> i64 {
        self.steps.steps_left()
    }

    /// Charges steps for work the contract itself defines.
    pub fn charge(&mut self, name: &str, steps: i64) -> Result<()> {
        self.steps.charge(StepCharge::new(name, steps))
    }

    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self
            .sm
            .world()
            .storage_get(&self.inv.to, key)
            .map(<[u8]>::to_vec);
        let len = value.as_ref().map_or(0, Vec::len);
        self.steps
            .charge(self.sm.config().step_costs.on_get(len))?;
        log::trace!("get {} {} ({} bytes)", self.inv.to, hex::encode(key), len);
        Ok(value)
    }

    pub fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        if self.inv.is_read_only {
            return Err(ExecutionError::access_denied("storage write"));
        }
        let costs = &self.sm.config().step_costs;
        let charge = if self.sm.world().storage_get(&self.inv.to, key).is_some() {
            costs.on_replace(value.len())
        } else {
            costs.on_set(value.len())
        };
        self.steps.charge(charge)?;
        log::trace!("set {} {} ({} bytes)", self.inv.to, hex::encode(key), value.len());
        self.sm.world_mut().storage_set(&self.inv.to, key, value);
        Ok(())
    }

    /// Removes a storage slot, returning whether it existed.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        if self.inv.is_read_only {
            return Err(ExecutionError::access_denied("storage delete"));
        }
        let len = match self.sm.world().storage_get(&self.inv.to, key) {
            Some(v) => v.len(),
            None => return Ok(false),
        };
        self.steps
            .charge(self.sm.config().step_costs.on_delete(len))?;
        self.sm.world_mut().storage_delete(&self.inv.to, key);
        Ok(true)
    }

    pub fn balance(&mut self, addr: &Address) -> Result<Amount> {
        self.steps.charge(self.sm.config().step_costs.on_api_call())?;
        Ok(self.sm.world().balance(addr))
    }

    /// Logs an event. The first indexed value names the event.
    pub fn emit(&mut self, indexed: Vec<Value>, data: Vec<Value>) -> Result<()> {
        if self.inv.is_read_only {
            return Err(ExecutionError::access_denied("event log"));
        }
        let event = EventLog::new(self.inv.to, indexed, data);
        self.steps
            .charge(self.sm.config().step_costs.on_event_log(event.encoded_len()))?;
        self.sm.world_mut().emit(event);
        Ok(())
    }

    /// Calls `method` on `to` through the service manager's invoke handler.
    ///
    /// The callee runs read-only if this frame does, and may use at most the steps this frame
    /// has left; whatever it uses is charged here. A failing callee fails this frame with the
    /// same status.
    pub fn call(
        &mut self,
        to: Address,
        value: Amount,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value> {
        let (code, code_state) = match self.sm.world().contract(&to) {
            Some(c) => (c.code.clone(), Some(c.code_state.clone())),
            None => (String::new(), None),
        };
        let eid = self.sm.next_eid();
        let inv = Invocation {
            code,
            is_read_only: self.inv.is_read_only,
            from: self.inv.to,
            to,
            value,
            step_limit: self.steps.steps_left(),
            method: method.to_string(),
            params,
            info: self.inv.info.clone(),
            cid: self.inv.cid.clone(),
            eid,
            code_state,
        };
        let result = self.sm.invoke(&inv)?;
        self.steps.charge(StepCharge::new("Call", result.step_used))?;
        if result.is_success() {
            return Ok(result.ret);
        }
        let message = match result.ret {
            Value::Str(s) => s,
            other => format!("{:?}", other),
        };
        Err(ExecutionError::failure(result.status, message))
    }

    /// Sends `amount` to `to`, running its fallback if it is a contract.
    pub fn transfer(&mut self, to: Address, amount: Amount) -> Result<()> {
        let method = if to.is_contract() { METHOD_FALLBACK } else { "" };
        self.call(to, amount, method, Vec::new()).map(|_| ())
    }
}
