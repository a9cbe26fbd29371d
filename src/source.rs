/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Data sources that keep the [`EntityStore`] current.
//!
//! A source writes into the store and pokes the [`ChangeNotifier`]
//! after every mutation; it never talks to the UI directly. Startup
//! failures are returned from [`ClusterSource::start`] and are fatal.
//! Failures after startup are logged, recorded in the store, and
//! retried by the source itself.

mod cluster;
mod fixture;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
pub(crate) use cluster::KubeSource;
pub(crate) use fixture::FixtureSource;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::bridge::ChangeNotifier;
use crate::config::Args;
use crate::store::EntityStore;

#[derive(Debug, thiserror::Error)]
pub(crate) enum SourceError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("failed to infer cluster configuration: {0}")]
    Infer(#[from] kube::config::InferConfigError),

    #[error("failed to create cluster client: {0}")]
    Client(#[from] kube::Error),

    #[error("failed to read fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Counts watchers that finished their initial listing.
#[derive(Debug, Clone)]
pub(crate) struct SyncReporter {
    tx: Arc<watch::Sender<usize>>,
}

impl SyncReporter {
    /// Report one watcher as synced. Call once per watcher.
    pub(crate) fn synced(&self) {
        self.tx.send_modify(|n| *n += 1);
    }
}

/// Running data source.
#[derive(Debug)]
pub(crate) struct SourceHandle {
    synced: watch::Receiver<usize>,
    required: usize,
    tasks: Vec<JoinHandle<()>>,
}

impl SourceHandle {
    /// A handle that is synced once `required` watchers report.
    pub(crate) fn new(required: usize) -> (Self, SyncReporter) {
        let (tx, rx) = watch::channel(0);
        (
            Self {
                synced: rx,
                required,
                tasks: Vec::new(),
            },
            SyncReporter { tx: Arc::new(tx) },
        )
    }

    pub(crate) fn push_task(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    /// Wait until every watcher finished its initial listing. Returns
    /// false if the watchers stopped before that.
    pub(crate) async fn wait_synced(&mut self) -> bool {
        let required = self.required;
        self.synced.wait_for(|n| *n >= required).await.is_ok()
    }

    pub(crate) fn is_synced(&self) -> bool {
        *self.synced.borrow() >= self.required
    }

    /// Stop every background task.
    pub(crate) fn shutdown(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}

/// Something that can populate the store.
#[async_trait]
pub(crate) trait ClusterSource: Send {
    /// Human readable origin, shown while syncing.
    fn describe(&self) -> String;

    /// Load the initial state and start background watchers.
    async fn start(
        self: Box<Self>,
        store: EntityStore,
        notifier: ChangeNotifier,
    ) -> Result<SourceHandle, SourceError>;
}

/// Pick the source selected on the command line.
pub(crate) fn from_args(args: &Args) -> Box<dyn ClusterSource> {
    match &args.fixture {
        Some(path) => Box::new(FixtureSource::new(path.clone(), args.fixture_poll())),
        None => Box::new(KubeSource::new(
            args.kubeconfig.clone(),
            args.context.clone(),
        )),
    }
}
