// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT

//! A test harness for contract execution. A [`ServiceManager`] simulates the ledger, runs
//! [`Contract`] code and routes every invocation through a swappable [`InvokeHandler`].

pub mod config;
pub mod contract;
pub mod error;
pub mod frame;
pub mod invocation;
pub mod invoke_handler;
pub mod journal;
pub mod service_manager;
pub mod step;
pub mod transport;
pub mod world;

pub use config::Config;
pub use contract::{param, Contract};
pub use error::{Error, ExecutionError, Failure, Result};
pub use frame::Frame;
pub use invocation::Invocation;
pub use invoke_handler::{default_handler, DefaultHandler, InvokeHandler, Outcome, Recorder};
pub use service_manager::ServiceManager;
