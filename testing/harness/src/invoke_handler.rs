// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::io;
use std::sync::{Mutex, PoisonError};

use ee_shared::{InvokeResult, Status};

use crate::invocation::Invocation;
use crate::service_manager::ServiceManager;

/// Strategy used by a [`ServiceManager`] to carry out an invocation.
///
/// Every invocation the service manager makes, top-level or nested, goes through the installed
/// handler. Tests swap the handler to mock contracts, inject faults or observe traffic without
/// touching call sites. The invocation is only borrowed: a handler can't alter its inputs.
pub trait InvokeHandler: Send + Sync {
    /// Runs `inv` against `sm`. The only error is a transport failure; execution failures are
    /// reported through the status of the returned result.
    fn invoke(&self, sm: &mut ServiceManager, inv: &Invocation) -> io::Result<InvokeResult>;
}

/// Forwards to [`ServiceManager::send_invoke_and_wait_for_result`], unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl InvokeHandler for DefaultHandler {
    fn invoke(&self, sm: &mut ServiceManager, inv: &Invocation) -> io::Result<InvokeResult> {
        sm.send_invoke_and_wait_for_result(inv)
    }
}

/// The pass-through handler.
pub fn default_handler() -> DefaultHandler {
    DefaultHandler
}

impl<F> InvokeHandler for F
where
    F: Fn(&mut ServiceManager, &Invocation) -> io::Result<InvokeResult> + Send + Sync,
{
    fn invoke(&self, sm: &mut ServiceManager, inv: &Invocation) -> io::Result<InvokeResult> {
        self(sm, inv)
    }
}

/// What a [`Recorder`] saw come back for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(Status),
    Failed(io::ErrorKind),
}

/// Records every invocation passing through it, then delegates to the wrapped handler.
#[derive(Debug, Default)]
pub struct Recorder<H> {
    inner: H,
    log: Mutex<Vec<(Invocation, Outcome)>>,
}

impl<H: InvokeHandler> Recorder<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Invocations seen so far, in the order they completed.
    pub fn records(&self) -> Vec<(Invocation, Outcome)> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|(inv, _)| inv.method)
            .collect()
    }
}

impl<H: InvokeHandler> InvokeHandler for Recorder<H> {
    fn invoke(&self, sm: &mut ServiceManager, inv: &Invocation) -> io::Result<InvokeResult> {
        let ret = self.inner.invoke(sm, inv);
        let outcome = match &ret {
            Ok(r) => Outcome::Completed(r.status),
            Err(e) => Outcome::Failed(e.kind()),
        };
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((inv.clone(), outcome));
        ret
    }
}
