// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
#![allow(dead_code)]

use ee_shared::{Address, Amount, Status, Value, METHOD_FALLBACK, METHOD_INIT};
use ee_test::{param, Config, Contract, ExecutionError, Frame, Result, ServiceManager};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

pub const HELLO: &str = "hello";
pub const TOKEN: &str = "token";
pub const PROXY: &str = "proxy";
pub const BURNER: &str = "burner";
pub const VAULT: &str = "vault";
pub const SINK: &str = "codeHash1";

/// Accepts any call, with or without value, and returns nothing.
pub struct Sink;

impl Contract for Sink {
    fn invoke(&self, _: &mut Frame<'_>, _: &str, _: &[Value]) -> Result<Value> {
        Ok(Value::Null)
    }

    fn is_payable(&self, _: &str) -> bool {
        true
    }
}

pub struct HelloWorld;

impl Contract for HelloWorld {
    fn invoke(&self, frame: &mut Frame<'_>, method: &str, params: &[Value]) -> Result<Value> {
        match method {
            METHOD_INIT | "setName" => {
                let name: String = param(params, 0)?;
                frame.set(b"name", name.into_bytes())?;
                Ok(Value::Null)
            }
            "hello" => {
                let name = frame.get(b"name")?.unwrap_or_default();
                Ok(Value::from(format!(
                    "Hello, {}!",
                    String::from_utf8_lossy(&name)
                )))
            }
            "height" => Ok(Value::from(frame.block_height())),
            "origin" => Ok(Value::from(frame.origin())),
            "context" => Ok(Value::List(vec![
                Value::from(frame.owner()),
                Value::from(frame.method()),
                Value::from(frame.block_timestamp()),
                Value::from(frame.tx_index()),
                Value::from(frame.tx_hash()),
            ])),
            _ => Err(ExecutionError::method_not_found(method)),
        }
    }
}

/// A fungible token. The deployer receives the initial supply.
pub struct Token;

impl Token {
    fn key(addr: &Address) -> Vec<u8> {
        let mut key = b"balance:".to_vec();
        key.extend(addr.to_bytes());
        key
    }

    fn balance_of(frame: &mut Frame<'_>, addr: &Address) -> Result<BigInt> {
        Ok(frame
            .get(&Self::key(addr))?
            .map(|b| BigInt::from_signed_bytes_be(&b))
            .unwrap_or_default())
    }

    fn set_balance(frame: &mut Frame<'_>, addr: &Address, amount: BigInt) -> Result<()> {
        if amount.is_zero() {
            frame.delete(&Self::key(addr)).map(|_| ())
        } else {
            frame.set(&Self::key(addr), amount.to_signed_bytes_be())
        }
    }
}

impl Contract for Token {
    fn invoke(&self, frame: &mut Frame<'_>, method: &str, params: &[Value]) -> Result<Value> {
        match method {
            METHOD_INIT => {
                let supply: BigInt = param(params, 0)?;
                let owner = frame.caller();
                Self::set_balance(frame, &owner, supply)?;
                Ok(Value::Null)
            }
            "balanceOf" => {
                let who: Address = param(params, 0)?;
                Ok(Value::from(Self::balance_of(frame, &who)?))
            }
            "transfer" => {
                let to: Address = param(params, 0)?;
                let amount: BigInt = param(params, 1)?;
                if amount.is_negative() {
                    return Err(ExecutionError::failure(
                        Status::INVALID_PARAMETER,
                        "negative amount",
                    ));
                }
                let from = frame.caller();
                let available = Self::balance_of(frame, &from)?;
                if available < amount {
                    return Err(ExecutionError::revert(1, "insufficient balance"));
                }
                Self::set_balance(frame, &from, available - &amount)?;
                let credited = Self::balance_of(frame, &to)? + &amount;
                Self::set_balance(frame, &to, credited)?;
                frame.emit(
                    vec![
                        Value::from("Transfer(Address,Address,int)"),
                        Value::from(from),
                        Value::from(to),
                    ],
                    vec![Value::from(amount)],
                )?;
                Ok(Value::Null)
            }
            METHOD_FALLBACK => Ok(Value::Null),
            _ => Err(ExecutionError::method_not_found(method)),
        }
    }
}

/// Calls other contracts.
pub struct Proxy;

impl Contract for Proxy {
    fn invoke(&self, frame: &mut Frame<'_>, method: &str, params: &[Value]) -> Result<Value> {
        match method {
            METHOD_INIT => Ok(Value::Null),
            "forward" => {
                let to: Address = param(params, 0)?;
                let target: String = param(params, 1)?;
                frame.call(to, Amount::zero(), &target, params[2..].to_vec())
            }
            // Like forward, but reports a failed callee's status instead of failing.
            "tryForward" => {
                let to: Address = param(params, 0)?;
                let target: String = param(params, 1)?;
                match frame.call(to, Amount::zero(), &target, params[2..].to_vec()) {
                    Err(ExecutionError::Failure(f)) => Ok(Value::from(i64::from(f.status.value()))),
                    other => other,
                }
            }
            "pay" => {
                let to: Address = param(params, 0)?;
                let amount: Amount = param(params, 1)?;
                frame.transfer(to, amount)?;
                Ok(Value::Null)
            }
            "recurse" => {
                let me = frame.address();
                frame.call(me, Amount::zero(), "recurse", Vec::new())
            }
            _ => Err(ExecutionError::method_not_found(method)),
        }
    }

    fn is_payable(&self, method: &str) -> bool {
        matches!(method, METHOD_FALLBACK | "pay")
    }
}

pub struct Burner;

impl Contract for Burner {
    fn invoke(&self, frame: &mut Frame<'_>, method: &str, params: &[Value]) -> Result<Value> {
        match method {
            METHOD_INIT => Ok(Value::Null),
            "burn" => {
                let steps: i64 = param(params, 0)?;
                frame.charge("burn", steps)?;
                Ok(Value::from(frame.steps_left()))
            }
            "spin" => loop {
                frame.charge("spin", 1_000)?;
            },
            _ => Err(ExecutionError::method_not_found(method)),
        }
    }
}

/// A key-value store that can be told to fail after writing.
pub struct Vault;

impl Contract for Vault {
    fn invoke(&self, frame: &mut Frame<'_>, method: &str, params: &[Value]) -> Result<Value> {
        match method {
            METHOD_INIT => Ok(Value::Null),
            "store" | "storeThenFail" => {
                let key: Vec<u8> = param(params, 0)?;
                let value: Vec<u8> = param(params, 1)?;
                frame.set(&key, value.clone())?;
                frame.emit(
                    vec![Value::from("Stored(bytes)"), Value::from(key)],
                    vec![Value::from(value)],
                )?;
                if method == "storeThenFail" {
                    let code: i64 = param(params, 2)?;
                    let code = u32::try_from(code).map_err(|_| {
                        ExecutionError::failure(Status::INVALID_PARAMETER, "revert code out of range")
                    })?;
                    return Err(ExecutionError::revert(code, "told to fail"));
                }
                Ok(Value::Null)
            }
            "load" => {
                let key: Vec<u8> = param(params, 0)?;
                Ok(Value::from(frame.get(&key)?))
            }
            "remove" => {
                let key: Vec<u8> = param(params, 0)?;
                Ok(Value::from(frame.delete(&key)?))
            }
            "deposit" | METHOD_FALLBACK => {
                let me = frame.address();
                Ok(Value::from(frame.balance(&me)?))
            }
            _ => Err(ExecutionError::method_not_found(method)),
        }
    }

    fn is_payable(&self, method: &str) -> bool {
        matches!(method, METHOD_FALLBACK | "deposit")
    }
}

/// A service manager with every test contract registered and no fees.
pub fn new_service_manager() -> ServiceManager {
    with_config(Config::default().with_step_price(0))
}

pub fn with_config(config: Config) -> ServiceManager {
    let mut sm = ServiceManager::new(config);
    sm.register_code(HELLO, HelloWorld);
    sm.register_code(TOKEN, Token);
    sm.register_code(PROXY, Proxy);
    sm.register_code(BURNER, Burner);
    sm.register_code(VAULT, Vault);
    sm.register_code(SINK, Sink);
    sm
}

pub struct Deployed {
    pub hello: Address,
    pub token: Address,
    pub proxy: Address,
    pub burner: Address,
    pub vault: Address,
}

/// Deploys one of each contract, owned by `owner`. The token's supply goes to `owner`.
pub fn deploy_all(sm: &mut ServiceManager, owner: Address) -> Deployed {
    Deployed {
        hello: sm
            .deploy(owner, HELLO, vec![Value::from("world")])
            .unwrap(),
        token: sm
            .deploy(owner, TOKEN, vec![Value::from(1_000_000i64)])
            .unwrap(),
        proxy: sm.deploy(owner, PROXY, vec![]).unwrap(),
        burner: sm.deploy(owner, BURNER, vec![]).unwrap(),
        vault: sm.deploy(owner, VAULT, vec![]).unwrap(),
    }
}
