// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod address;
pub mod econ;
pub mod event;
pub mod result;
pub mod state;
pub mod status;
pub mod value;

pub use address::Address;
pub use econ::Amount;
pub use event::EventLog;
pub use result::InvokeResult;
pub use state::CodeState;
pub use status::Status;
pub use value::Value;

/// Method run once when a contract is deployed.
pub const METHOD_INIT: &str = "<init>";
/// Method run when a contract receives a plain transfer.
pub const METHOD_FALLBACK: &str = "fallback";
