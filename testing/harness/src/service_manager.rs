// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use anyhow::Result;
use ee_shared::{
    Address, Amount, CodeState, EventLog, InvokeResult, Status, Value, METHOD_FALLBACK,
    METHOD_INIT,
};
use num_bigint::BigInt;
use num_traits::Zero;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::contract::Contract;
use crate::error::{Error, ExecutionError};
use crate::frame::Frame;
use crate::invocation::{info, Invocation};
use crate::invoke_handler::{DefaultHandler, InvokeHandler};
use crate::step::{StepCharge, StepTracker};
use crate::transport::Transport;
use crate::world::{ContractInfo, WorldState};

/// Balance given to each account made by [`ServiceManager::create_accounts`], in ICX.
const INITIAL_ICX: i64 = 1000;

/// Simulates the ledger side of contract execution: it owns the world state and the contract
/// code, hands invocations to the installed [`InvokeHandler`], and runs them synchronously.
///
/// Cloning yields an independent ledger sharing the same code and handler.
#[derive(Clone)]
pub struct ServiceManager {
    config: Config,
    world: WorldState,
    codes: BTreeMap<String, Arc<dyn Contract>>,
    handler: Arc<dyn InvokeHandler>,
    transport: Transport,
    rng: ChaCha8Rng,
    step_limit: i64,
    next_eid: i32,
    depth: usize,
    block_height: i64,
    block_timestamp: i64,
    tx_index: i64,
    tx_nonce: u64,
    deploy_nonce: u64,
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ServiceManager {
    pub fn new(config: Config) -> Self {
        Self {
            step_limit: config.max_step_limit,
            block_height: config.initial_height,
            block_timestamp: config.initial_timestamp,
            config,
            world: WorldState::default(),
            codes: BTreeMap::new(),
            handler: Arc::new(DefaultHandler),
            transport: Transport::default(),
            rng: ChaCha8Rng::seed_from_u64(8),
            next_eid: 1,
            depth: 0,
            tx_index: 0,
            tx_nonce: 0,
            deploy_nonce: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// Installs the handler used for every subsequent invocation, including nested calls.
    pub fn set_invoke_handler<H: InvokeHandler + 'static>(&mut self, handler: H) {
        self.handler = Arc::new(handler);
    }

    /// Like [`Self::set_invoke_handler`], for handlers the caller keeps a reference to.
    pub fn set_shared_invoke_handler(&mut self, handler: Arc<dyn InvokeHandler>) {
        self.handler = handler;
    }

    pub fn invoke_handler(&self) -> Arc<dyn InvokeHandler> {
        Arc::clone(&self.handler)
    }

    /// Runs `inv` through the installed handler.
    pub fn invoke(&mut self, inv: &Invocation) -> io::Result<InvokeResult> {
        let handler = Arc::clone(&self.handler);
        handler.invoke(self, inv)
    }

    /// Sends the invocation to the engine and blocks until its result is back.
    ///
    /// State changes are kept only if the invocation succeeds. A transport failure is returned
    /// as an error and leaves no state changes behind.
    pub fn send_invoke_and_wait_for_result(&mut self, inv: &Invocation) -> io::Result<InvokeResult> {
        if let Err(e) = self.transport.check() {
            log::warn!("invoke eid={} not sent: {}", inv.eid, e);
            return Err(e);
        }
        log::debug!(
            "invoke eid={} {}.{} from={} value={} limit={}",
            inv.eid,
            inv.to,
            inv.method,
            inv.from,
            inv.value,
            inv.step_limit
        );

        let mut steps = StepTracker::new(inv.step_limit.min(self.config.max_step_limit));
        self.world.begin_transaction();
        let ret = self.execute(inv, &mut steps);
        if ret.is_ok() && !inv.is_read_only {
            self.advance_code_state(inv);
        }
        self.world
            .end_transaction(ret.is_err())
            .map_err(io::Error::other)?;

        match ret {
            Ok(value) => {
                log::debug!("invoke eid={} done steps={}", inv.eid, steps.step_used());
                Ok(InvokeResult::success(steps.step_used(), value))
            }
            Err(ExecutionError::Failure(f)) => {
                log::warn!("invoke eid={} failed: {}", inv.eid, f);
                Ok(InvokeResult::failure(f.status, steps.step_used(), f.message))
            }
            Err(ExecutionError::Io(e)) => {
                log::warn!("invoke eid={} aborted: {}", inv.eid, e);
                Err(e)
            }
        }
    }

    fn execute(&mut self, inv: &Invocation, steps: &mut StepTracker) -> crate::Result<Value> {
        if inv.value.is_negative() {
            return Err(ExecutionError::failure(
                Status::INVALID_PARAMETER,
                format!("negative value {}", inv.value),
            ));
        }
        if self.depth >= self.config.max_call_depth {
            return Err(ExecutionError::failure(
                Status::STACK_OVERFLOW,
                format!("call depth exceeds {}", self.config.max_call_depth),
            ));
        }
        if !inv.value.is_zero() {
            if inv.is_read_only {
                return Err(ExecutionError::access_denied("value transfer"));
            }
            self.world.transfer(&inv.from, &inv.to, &inv.value)?;
        }
        if !inv.to.is_contract() {
            return Ok(Value::Null);
        }

        let contract = self.codes.get(&inv.code).cloned().ok_or_else(|| {
            ExecutionError::failure(
                Status::CONTRACT_NOT_FOUND,
                format!("no code {:?}", inv.code),
            )
        })?;
        if self.world.contract(&inv.to).is_none() {
            return Err(ExecutionError::failure(
                Status::CONTRACT_NOT_FOUND,
                format!("no contract at {}", inv.to),
            ));
        }

        let costs = &self.config.step_costs;
        steps.charge(costs.on_contract_call())?;
        steps.charge(costs.on_input(inv.input_len()))?;
        if !inv.value.is_zero() && !contract.is_payable(&inv.method) {
            return Err(ExecutionError::failure(
                Status::METHOD_NOT_PAYABLE,
                format!("method {} is not payable", inv.method),
            ));
        }

        self.depth += 1;
        let ret = {
            let mut frame = Frame::new(self, inv, steps);
            contract.invoke(&mut frame, &inv.method, &inv.params)
        };
        self.depth -= 1;
        ret
    }

    fn advance_code_state(&mut self, inv: &Invocation) {
        if let Some(info) = self.world.contract(&inv.to) {
            let next = info
                .code_state
                .advance(self.world.storage_hash(&inv.to), inv.eid);
            self.world.set_code_state(&inv.to, next);
        }
    }

    /// Allocates an execution id.
    pub fn next_eid(&mut self) -> i32 {
        let eid = self.next_eid;
        self.next_eid = self.next_eid.wrapping_add(1);
        eid
    }

    /// Makes `contract` available to invocations under `code`.
    pub fn register_code<C: Contract + 'static>(&mut self, code: impl Into<String>, contract: C) {
        self.codes.insert(code.into(), Arc::new(contract));
    }

    /// Creates accounts holding 1000 ICX each, returning their addresses.
    pub fn create_accounts<const N: usize>(&mut self) -> Result<[Address; N]> {
        let mut ret = [Address::new_account([0; 20]); N];
        for account in ret.iter_mut() {
            let mut body = [0u8; 20];
            self.rng.try_fill_bytes(&mut body)?;
            *account = Address::new_account(body);
            self.world.set_balance(*account, Amount::from_icx(INITIAL_ICX));
        }
        Ok(ret)
    }

    pub fn set_balance(&mut self, addr: Address, amount: Amount) {
        self.world.set_balance(addr, amount);
    }

    pub fn balance(&self, addr: &Address) -> Amount {
        self.world.balance(addr)
    }

    /// Sets the step limit given to each transaction.
    pub fn set_step_limit(&mut self, limit: i64) {
        self.step_limit = limit;
    }

    /// Deploys a contract running `code` owned by `owner`, and runs its `<init>` with `params`.
    /// Nothing is deployed if `<init>` fails.
    pub fn deploy(&mut self, owner: Address, code: &str, params: Vec<Value>) -> Result<Address> {
        if !self.codes.contains_key(code) {
            return Err(Error::UnknownCode(code.to_string()).into());
        }
        let addr = self.contract_address(&owner);
        let costs = &self.config.step_costs;
        let base = [
            costs.on_transaction(),
            costs.on_contract_create(),
            costs.on_contract_set(code.len()),
        ];

        self.world.begin_transaction();
        self.world.set_contract(
            addr,
            ContractInfo {
                code: code.to_string(),
                owner,
                code_state: CodeState::default(),
            },
        );
        let result = self.transact(owner, addr, Amount::zero(), METHOD_INIT, params, false, &base);
        let failed = !matches!(&result, Ok(r) if r.is_success());
        self.world.end_transaction(failed)?;
        let result = result?;
        self.charge_fee(&owner, result.step_used);

        if !result.is_success() {
            return Err(Error::DeployFailed {
                code: code.to_string(),
                result,
            }
            .into());
        }
        log::debug!("deployed {} at {}", code, addr);
        Ok(addr)
    }

    /// Sends a writing transaction calling `method` on `to`. Fees are charged to `from`
    /// whether or not the call succeeds.
    pub fn call(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
        method: &str,
        params: Vec<Value>,
    ) -> Result<InvokeResult> {
        let base = [self.config.step_costs.on_transaction()];
        let result = self.transact(from, to, value, method, params, false, &base)?;
        self.charge_fee(&from, result.step_used);
        Ok(result)
    }

    /// Sends `value` from `from` to `to`; a contract receives it through its fallback.
    pub fn transfer(&mut self, from: Address, to: Address, value: Amount) -> Result<InvokeResult> {
        let method = if to.is_contract() { METHOD_FALLBACK } else { "" };
        self.call(from, to, value, method, Vec::new())
    }

    /// Runs `method` on `to` read-only. Nothing is charged.
    pub fn query(&mut self, to: Address, method: &str, params: Vec<Value>) -> Result<InvokeResult> {
        let anonymous = Address::new_account([0; 20]);
        self.transact(anonymous, to, Amount::zero(), method, params, true, &[])
    }

    #[allow(clippy::too_many_arguments)]
    fn transact(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
        method: &str,
        params: Vec<Value>,
        is_read_only: bool,
        base: &[StepCharge],
    ) -> Result<InvokeResult> {
        let mut steps = StepTracker::new(self.step_limit.min(self.config.max_step_limit));
        for charge in base {
            if let Err(e) = steps.charge(*charge) {
                return Ok(InvokeResult::failure(
                    Status::OUT_OF_STEP,
                    steps.step_used(),
                    e.to_string(),
                ));
            }
        }

        let limit = steps.steps_left();
        let inv = self.new_invocation(from, to, value, method, params, is_read_only, limit);
        let result = self.invoke(&inv)?;
        if steps.charge(StepCharge::new("Invoke", result.step_used)).is_err() {
            log::warn!("handler reported {} steps over a limit of {}", result.step_used, inv.step_limit);
        }
        Ok(InvokeResult {
            step_used: steps.step_used(),
            ..result
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn new_invocation(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
        method: &str,
        params: Vec<Value>,
        is_read_only: bool,
        step_limit: i64,
    ) -> Invocation {
        self.tx_nonce += 1;
        let tx_hash = blake2b_simd::Params::new()
            .hash_length(32)
            .to_state()
            .update(&from.to_bytes())
            .update(&to.to_bytes())
            .update(&self.tx_nonce.to_be_bytes())
            .update(method.as_bytes())
            .finalize()
            .as_bytes()
            .to_vec();

        let mut info = BTreeMap::new();
        info.insert(info::BLOCK_HEIGHT.to_string(), Value::from(self.block_height));
        info.insert(info::BLOCK_TIMESTAMP.to_string(), Value::from(self.block_timestamp));
        info.insert(info::TX_INDEX.to_string(), Value::from(self.tx_index));
        info.insert(info::TX_HASH.to_string(), Value::from(tx_hash.clone()));
        info.insert(info::TX_TIMESTAMP.to_string(), Value::from(self.block_timestamp));
        info.insert(info::TX_NONCE.to_string(), Value::from(self.tx_nonce));
        info.insert(info::TX_FROM.to_string(), Value::from(from));
        info.insert(info::REVISION.to_string(), Value::from(self.config.revision));
        info.insert(info::STEP_COSTS.to_string(), self.config.step_costs.to_value());
        if !is_read_only {
            self.tx_index += 1;
        }

        let (code, code_state) = match self.world.contract(&to) {
            Some(c) => (c.code.clone(), Some(c.code_state.clone())),
            None => (String::new(), None),
        };
        Invocation {
            code,
            is_read_only,
            from,
            to,
            value,
            step_limit,
            method: method.to_string(),
            params,
            info,
            cid: tx_hash,
            eid: self.next_eid(),
            code_state,
        }
    }

    /// Moves the fee for `step_used` steps from `payer` to the treasury, or whatever the payer
    /// has left if that's less.
    fn charge_fee(&mut self, payer: &Address, step_used: i64) {
        let fee = Amount::from(BigInt::from(step_used) * BigInt::from(self.config.step_price));
        let fee = fee.min(self.world.balance(payer));
        let treasury = self.config.treasury;
        if let Err(e) = self.world.transfer(payer, &treasury, &fee) {
            log::warn!("fee not charged to {}: {}", payer, e);
        }
    }

    fn contract_address(&mut self, owner: &Address) -> Address {
        self.deploy_nonce += 1;
        let hash = blake2b_simd::Params::new()
            .hash_length(20)
            .to_state()
            .update(&owner.to_bytes())
            .update(&self.deploy_nonce.to_be_bytes())
            .finalize();
        let mut body = [0u8; 20];
        body.copy_from_slice(hash.as_bytes());
        Address::new_contract(body)
    }

    /// Moves to the next block.
    pub fn next_block(&mut self) {
        self.block_height += 1;
        self.block_timestamp += self.config.block_interval;
        self.tx_index = 0;
    }

    pub fn block_height(&self) -> i64 {
        self.block_height
    }

    pub fn events(&self) -> &[EventLog] {
        self.world.events()
    }

    pub fn take_events(&mut self) -> Vec<EventLog> {
        self.world.take_events()
    }

    pub fn storage_value(&self, addr: &Address, key: &[u8]) -> Option<Vec<u8>> {
        self.world.storage_get(addr, key).map(<[u8]>::to_vec)
    }

    pub fn contract(&self, addr: &Address) -> Option<&ContractInfo> {
        self.world.contract(addr)
    }

    pub fn code_state(&self, addr: &Address) -> Option<CodeState> {
        self.world.contract(addr).map(|c| c.code_state.clone())
    }

    /// Closes the simulated connection; every later invocation fails with `NotConnected`.
    pub fn close(&mut self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Makes the next invocation fail in transport with `kind`.
    pub fn inject_fault(&mut self, kind: io::ErrorKind) {
        log::warn!("injecting transport fault: {:?}", kind);
        self.transport.inject(kind);
    }
}
