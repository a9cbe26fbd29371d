/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Coalescing bridge between data-source callbacks and the event
//! loop.
//!
//! Producers call [`ChangeNotifier::notify`] from any context
//! (watcher tasks, plain threads). The call never blocks: the
//! underlying channel has room for exactly one pending signal, and
//! a notification that finds the slot occupied is dropped because
//! the pending one already carries the same fact. The consumer side,
//! [`WatchBridge::next_change`], therefore observes at least one
//! signal per burst, never one per event.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Outcome of waiting on the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeSignal {
    /// Something in the store changed since the last signal.
    Changed,
    /// The bridge was shut down or every notifier is gone.
    Closed,
}

/// Producer half. Cheap to clone; hand one to every watcher.
#[derive(Debug, Clone)]
pub(crate) struct ChangeNotifier {
    tx: mpsc::Sender<()>,
}

impl ChangeNotifier {
    /// Record that a change happened. Returns immediately.
    pub(crate) fn notify(&self) {
        match self.tx.try_send(()) {
            Ok(()) => tracing::trace!("change signal queued"),
            Err(TrySendError::Full(())) => tracing::trace!("change signal coalesced"),
            Err(TrySendError::Closed(())) => {}
        }
    }
}

/// Consumer half, owned by the event loop.
#[derive(Debug)]
pub(crate) struct WatchBridge {
    rx: mpsc::Receiver<()>,
    closed: bool,
}

impl WatchBridge {
    /// Create a connected bridge/notifier pair.
    pub(crate) fn new() -> (Self, ChangeNotifier) {
        let (tx, rx) = mpsc::channel(1);
        (Self { rx, closed: false }, ChangeNotifier { tx })
    }

    /// Wait for the next coalesced change.
    ///
    /// Cancel safe: dropping the future before it resolves loses no
    /// signal, which is what `tokio::select!` in the event loop
    /// relies on.
    pub(crate) async fn next_change(&mut self) -> ChangeSignal {
        if self.closed {
            return ChangeSignal::Closed;
        }
        match self.rx.recv().await {
            Some(()) => ChangeSignal::Changed,
            None => {
                self.closed = true;
                ChangeSignal::Closed
            }
        }
    }

    /// Close the bridge. Producers keep working (their signals are
    /// discarded) and every later `next_change` returns `Closed`.
    pub(crate) fn shutdown(&mut self) {
        self.closed = true;
        self.rx.close();
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }
}
