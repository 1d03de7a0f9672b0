// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
mod common;

use common::*;
use ee_shared::{Address, Amount, Status, Value};
use ee_test::config::DEFAULT_STEP_PRICE;
use ee_test::{Config, Error, Invocation, ServiceManager};
use num_bigint::BigInt;
use num_traits::Zero;
use pretty_assertions::assert_eq;

fn setup() -> (ServiceManager, Address, Address, Deployed) {
    let mut sm = new_service_manager();
    let [owner, other] = sm.create_accounts().unwrap();
    let d = deploy_all(&mut sm, owner);
    sm.take_events();
    (sm, owner, other, d)
}

fn bytes(b: &[u8]) -> Value {
    Value::from(b.to_vec())
}

#[test]
fn accounts_are_deterministic() {
    let mut a = ServiceManager::default();
    let mut b = ServiceManager::default();
    let accounts: [Address; 3] = a.create_accounts().unwrap();
    assert_eq!(accounts, b.create_accounts().unwrap());
    assert_ne!(accounts[0], accounts[1]);
    for addr in &accounts {
        assert!(!addr.is_contract());
        assert_eq!(a.balance(addr), Amount::from_icx(1000));
    }
}

#[test]
fn deploy_runs_init() {
    let (mut sm, owner, _, d) = setup();
    let info = sm.contract(&d.hello).unwrap();
    assert_eq!(info.code, HELLO);
    assert_eq!(info.owner, owner);

    let ret = sm.query(d.hello, "hello", vec![]).unwrap();
    assert_eq!(ret.status, Status::SUCCESS);
    assert_eq!(ret.ret, Value::from("Hello, world!"));

    let state = sm.code_state(&d.hello).unwrap();
    assert_eq!(state.next_hash, 1);
    assert_eq!(state.object_graph_hash, sm.world().storage_hash(&d.hello));
}

#[test]
fn deploy_failures() {
    let mut sm = new_service_manager();
    let [owner] = sm.create_accounts().unwrap();

    let err = sm.deploy(owner, "missing", vec![]).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownCode(c)) if c == "missing"));

    // The token's constructor requires a supply.
    let err = sm.deploy(owner, TOKEN, vec![]).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::DeployFailed { code, result }) => {
            assert_eq!(code, TOKEN);
            assert_eq!(result.status, Status::INVALID_PARAMETER);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!sm.world().in_transaction());
}

#[test]
fn writes_advance_code_state() {
    let (mut sm, owner, _, d) = setup();
    let before = sm.code_state(&d.vault).unwrap();

    let ret = sm
        .call(owner, d.vault, Amount::zero(), "store", vec![bytes(b"k"), bytes(b"v")])
        .unwrap();
    assert_eq!(ret.status, Status::SUCCESS);
    let after = sm.code_state(&d.vault).unwrap();
    assert_eq!(after.next_hash, before.next_hash + 1);
    assert_ne!(after.object_graph_hash, before.object_graph_hash);
    assert!(after.prev_eid > before.prev_eid);

    // Neither queries nor failures move it.
    sm.query(d.vault, "load", vec![bytes(b"k")]).unwrap();
    sm.call(owner, d.vault, Amount::zero(), "nope", vec![])
        .unwrap();
    assert_eq!(sm.code_state(&d.vault).unwrap(), after);
}

#[test]
fn revert_discards_changes() {
    let (mut sm, owner, _, d) = setup();
    let state = sm.code_state(&d.vault);

    let ret = sm
        .call(owner, d.vault, Amount::zero(), "storeThenFail", vec![
            bytes(b"k"),
            bytes(b"v"),
            Value::from(7i64),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::user(7));
    assert_eq!(ret.ret, Value::from("told to fail"));
    assert!(ret.step_used > 0);
    assert_eq!(sm.storage_value(&d.vault, b"k"), None);
    assert!(sm.events().is_empty());
    assert_eq!(sm.code_state(&d.vault), state);
}

#[test]
fn out_of_range_revert_codes_are_rejected() {
    let (mut sm, owner, _, d) = setup();
    let state = sm.code_state(&d.vault);

    for code in [-1i64, i64::from(u32::MAX) + 1] {
        let ret = sm
            .call(owner, d.vault, Amount::zero(), "storeThenFail", vec![
                bytes(b"k"),
                bytes(b"v"),
                Value::from(code),
            ])
            .unwrap();
        assert_eq!(ret.status, Status::INVALID_PARAMETER);
        assert_eq!(sm.storage_value(&d.vault, b"k"), None);
    }
    assert!(sm.events().is_empty());
    assert_eq!(sm.code_state(&d.vault), state);
}

#[test]
fn nested_failure_is_contained() {
    let (mut sm, owner, _, d) = setup();
    let ret = sm
        .call(owner, d.proxy, Amount::zero(), "tryForward", vec![
            Value::from(d.vault),
            Value::from("storeThenFail"),
            bytes(b"k"),
            bytes(b"v"),
            Value::from(7i64),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::SUCCESS);
    assert_eq!(ret.ret, Value::from(i64::from(Status::user(7).value())));
    assert_eq!(sm.storage_value(&d.vault, b"k"), None);
    assert!(sm.events().is_empty());
}

#[test]
fn nested_failure_propagates() {
    let (mut sm, owner, _, d) = setup();
    let ret = sm
        .call(owner, d.proxy, Amount::zero(), "forward", vec![
            Value::from(d.vault),
            Value::from("storeThenFail"),
            bytes(b"k"),
            bytes(b"v"),
            Value::from(2i64),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::user(2));
    assert_eq!(sm.storage_value(&d.vault, b"k"), None);
}

#[test]
fn token_transfer() {
    let (mut sm, owner, other, d) = setup();
    let ret = sm
        .call(owner, d.token, Amount::zero(), "transfer", vec![
            Value::from(other),
            Value::from(100i64),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::SUCCESS);

    let balance = |sm: &mut ServiceManager, who: Address| {
        sm.query(d.token, "balanceOf", vec![Value::from(who)])
            .unwrap()
            .ret
    };
    assert_eq!(balance(&mut sm, other), Value::from(100i64));
    assert_eq!(balance(&mut sm, owner), Value::from(999_900i64));

    let events = sm.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].emitter, d.token);
    assert_eq!(events[0].signature(), Some("Transfer(Address,Address,int)"));
    assert_eq!(events[0].data, vec![Value::from(100i64)]);

    let ret = sm
        .call(other, d.token, Amount::zero(), "transfer", vec![
            Value::from(owner),
            Value::from(101i64),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::user(1));
    assert_eq!(balance(&mut sm, other), Value::from(100i64));
    assert!(sm.events().is_empty());
}

#[test]
fn read_only_calls_cannot_write() {
    let (mut sm, _, _, d) = setup();
    let ret = sm
        .query(d.vault, "store", vec![bytes(b"k"), bytes(b"v")])
        .unwrap();
    assert_eq!(ret.status, Status::ACCESS_DENIED);

    // Read-only mode carries over to nested calls.
    let ret = sm
        .query(d.proxy, "forward", vec![
            Value::from(d.vault),
            Value::from("store"),
            bytes(b"k"),
            bytes(b"v"),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::ACCESS_DENIED);
    assert_eq!(sm.storage_value(&d.vault, b"k"), None);
}

#[test]
fn running_out_of_steps() {
    let (mut sm, owner, _, d) = setup();
    sm.set_step_limit(200_000);
    let ret = sm
        .call(owner, d.burner, Amount::zero(), "spin", vec![])
        .unwrap();
    assert_eq!(ret.status, Status::OUT_OF_STEP);
    assert_eq!(ret.step_used, 200_000);

    // Not even enough for the transaction itself.
    sm.set_step_limit(50_000);
    let ret = sm
        .call(owner, d.hello, Amount::zero(), "hello", vec![])
        .unwrap();
    assert_eq!(ret.status, Status::OUT_OF_STEP);
    assert_eq!(ret.step_used, 50_000);
}

#[test]
fn steps_left_reflects_charges() {
    let (mut sm, owner, _, d) = setup();
    sm.set_step_limit(1_000_000);
    let costs = sm.config().step_costs.clone();
    let params = vec![Value::from(1_000i64)];
    let input = params.iter().map(Value::encoded_len).sum::<usize>() as i64 * costs.input;
    let ret = sm
        .call(owner, d.burner, Amount::zero(), "burn", params)
        .unwrap();
    let left = 1_000_000 - costs.default - costs.contract_call - input - 1_000;
    assert_eq!(ret.ret, Value::from(left));
    assert_eq!(ret.step_used, 1_000_000 - left);
}

#[test]
fn deleting_refunds_steps() {
    let (mut sm, owner, _, d) = setup();
    let value = vec![7u8; 100];
    let stored = sm
        .call(owner, d.vault, Amount::zero(), "store", vec![bytes(b"k"), Value::from(value)])
        .unwrap();
    let removed = sm
        .call(owner, d.vault, Amount::zero(), "remove", vec![bytes(b"k")])
        .unwrap();
    assert_eq!(removed.ret, Value::from(true));
    assert!(removed.step_used < stored.step_used);
    assert_eq!(sm.storage_value(&d.vault, b"k"), None);

    let again = sm
        .call(owner, d.vault, Amount::zero(), "remove", vec![bytes(b"k")])
        .unwrap();
    assert_eq!(again.ret, Value::from(false));
}

#[test]
fn call_depth_is_bounded() {
    let mut sm = with_config(Config::default().with_step_price(0).with_max_call_depth(8));
    let [owner] = sm.create_accounts().unwrap();
    let proxy = sm.deploy(owner, PROXY, vec![]).unwrap();
    let ret = sm
        .call(owner, proxy, Amount::zero(), "recurse", vec![])
        .unwrap();
    assert_eq!(ret.status, Status::STACK_OVERFLOW);
}

#[test]
fn value_transfers() {
    let (mut sm, owner, other, d) = setup();
    let before = sm.balance(&owner);

    let ret = sm.transfer(owner, other, Amount::from_icx(1)).unwrap();
    assert_eq!(ret.status, Status::SUCCESS);
    assert_eq!(sm.balance(&other), Amount::from_icx(1001));
    assert_eq!(sm.balance(&owner), before.clone() - Amount::from_icx(1));

    let ret = sm.transfer(owner, other, Amount::from_icx(5000)).unwrap();
    assert_eq!(ret.status, Status::OUT_OF_BALANCE);
    assert_eq!(sm.balance(&other), Amount::from_icx(1001));

    // A contract accepts value through its fallback.
    let ret = sm.transfer(owner, d.vault, Amount::from(10u64)).unwrap();
    assert_eq!(ret.ret, Value::from(10i64));
    assert_eq!(sm.balance(&d.vault), Amount::from(10u64));
}

#[test]
fn non_payable_methods_reject_value() {
    let (mut sm, owner, _, d) = setup();
    let before = sm.balance(&owner);
    let ret = sm
        .call(owner, d.token, Amount::from(1u64), "balanceOf", vec![Value::from(owner)])
        .unwrap();
    assert_eq!(ret.status, Status::METHOD_NOT_PAYABLE);
    assert_eq!(sm.balance(&owner), before);
    assert!(sm.balance(&d.token).is_zero());
}

#[test]
fn contracts_forward_value() {
    let (mut sm, owner, _, d) = setup();
    let ret = sm
        .call(owner, d.proxy, Amount::from(10u64), "pay", vec![
            Value::from(d.vault),
            Value::from(Amount::from(4u64)),
        ])
        .unwrap();
    assert_eq!(ret.status, Status::SUCCESS);
    assert_eq!(sm.balance(&d.proxy), Amount::from(6u64));
    assert_eq!(sm.balance(&d.vault), Amount::from(4u64));
}

#[test]
fn missing_contracts_and_methods() {
    let (mut sm, owner, _, d) = setup();
    let nowhere = Address::new_contract([9; 20]);
    let ret = sm
        .call(owner, nowhere, Amount::zero(), "hello", vec![])
        .unwrap();
    assert_eq!(ret.status, Status::CONTRACT_NOT_FOUND);

    let inv = Invocation::new("unregistered", owner, d.hello, "hello", vec![]).step_limit(1_000_000);
    let ret = sm.send_invoke_and_wait_for_result(&inv).unwrap();
    assert_eq!(ret.status, Status::CONTRACT_NOT_FOUND);

    let ret = sm
        .call(owner, d.hello, Amount::zero(), "nope", vec![])
        .unwrap();
    assert_eq!(ret.status, Status::METHOD_NOT_FOUND);
}

#[test]
fn block_metadata_reaches_contracts() {
    let (mut sm, owner, _, d) = setup();
    assert_eq!(sm.query(d.hello, "height", vec![]).unwrap().ret, Value::from(0i64));
    sm.next_block();
    sm.next_block();
    assert_eq!(sm.block_height(), 2);
    assert_eq!(sm.query(d.hello, "height", vec![]).unwrap().ret, Value::from(2i64));

    let context = |sm: &mut ServiceManager| {
        match sm
            .call(owner, d.hello, Amount::zero(), "context", vec![])
            .unwrap()
            .ret
        {
            Value::List(items) => items,
            other => panic!("unexpected return: {:?}", other),
        }
    };
    let first = context(&mut sm);
    let second = context(&mut sm);
    let timestamp = sm.config().initial_timestamp + 2 * sm.config().block_interval;
    assert_eq!(first[0], Value::from(owner));
    assert_eq!(first[1], Value::from("context"));
    assert_eq!(first[2], Value::from(timestamp));
    assert_eq!(first[3], Value::from(0i64));
    assert_eq!(second[3], Value::from(1i64));
    match (&first[4], &second[4]) {
        (Value::Bytes(a), Value::Bytes(b)) => {
            assert_eq!(a.len(), 32);
            assert_ne!(a, b);
        }
        other => panic!("unexpected tx hashes: {:?}", other),
    }

    // The origin is the transaction sender, not the immediate caller.
    let ret = sm
        .call(owner, d.proxy, Amount::zero(), "forward", vec![
            Value::from(d.hello),
            Value::from("origin"),
        ])
        .unwrap();
    assert_eq!(ret.ret, Value::from(owner));
}

#[test]
fn fees_go_to_the_treasury() {
    let mut sm = with_config(Config::default());
    let [owner] = sm.create_accounts().unwrap();
    let hello = sm
        .deploy(owner, HELLO, vec![Value::from("world")])
        .unwrap();
    let treasury = sm.config().treasury;
    let (payer_before, treasury_before) = (sm.balance(&owner), sm.balance(&treasury));

    let ret = sm
        .call(owner, hello, Amount::zero(), "setName", vec![Value::from("fees")])
        .unwrap();
    assert_eq!(ret.status, Status::SUCCESS);
    let fee = Amount::from(BigInt::from(ret.step_used) * DEFAULT_STEP_PRICE);
    assert_eq!(sm.balance(&owner), payer_before - &fee);
    assert_eq!(sm.balance(&treasury), treasury_before + &fee);

    // Queries are free.
    let before = sm.balance(&owner);
    sm.query(hello, "hello", vec![]).unwrap();
    assert_eq!(sm.balance(&owner), before);
}

#[test]
fn config_from_json() {
    let config = Config::from_json(r#"{"stepPrice": 0, "maxCallDepth": 4}"#).unwrap();
    let mut sm = with_config(config);
    let [owner] = sm.create_accounts().unwrap();
    let proxy = sm.deploy(owner, PROXY, vec![]).unwrap();
    let ret = sm
        .call(owner, proxy, Amount::zero(), "recurse", vec![])
        .unwrap();
    assert_eq!(ret.status, Status::STACK_OVERFLOW);
    assert_eq!(sm.balance(&owner), Amount::from_icx(1000));
}
