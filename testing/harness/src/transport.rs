// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::io;

/// Stands in for the connection between the service manager and the engine. Tests close it or
/// queue a fault to exercise the transport failure path.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    closed: bool,
    pending: Option<io::ErrorKind>,
}

impl Transport {
    /// Fails if the connection is closed, or with the queued fault (once).
    pub fn check(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection to execution engine closed",
            ));
        }
        match self.pending.take() {
            Some(kind) => Err(io::Error::new(kind, "injected transport fault")),
            None => Ok(()),
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Makes the next exchange fail with `kind`.
    pub fn inject(&mut self, kind: io::ErrorKind) {
        self.pending = Some(kind);
    }
}
