/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! File-backed source for demos and offline use.
//!
//! The file holds `nodes` and `pods` lists in the [`Node`]/[`Pod`]
//! shape, as YAML or JSON (YAML being a superset).

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::MissedTickBehavior;

use super::ClusterSource;
use super::SourceError;
use super::SourceHandle;
use crate::bridge::ChangeNotifier;
use crate::model::Node;
use crate::model::Pod;
use crate::store::EntityStore;

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    pods: Vec<Pod>,
}

#[derive(Debug)]
pub(crate) struct FixtureSource {
    path: PathBuf,
    poll: Option<Duration>,
}

impl FixtureSource {
    pub(crate) fn new(path: PathBuf, poll: Option<Duration>) -> Self {
        Self { path, poll }
    }
}

/// Read and parse a fixture file. Nodes without a payload get a
/// minimal one so the detail view has something to show.
pub(crate) async fn load(path: &Path) -> Result<(Vec<Node>, Vec<Pod>), SourceError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Fixture {
            path: path.to_path_buf(),
            source,
        })?;
    let mut file: FixtureFile = serde_yaml::from_str(&text).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    for node in &mut file.nodes {
        if node.payload.is_null() {
            node.payload = serde_json::json!({
                "metadata": {
                    "name": node.name,
                    "uid": node.uid,
                    "creationTimestamp": node.created.to_rfc3339(),
                },
            });
        }
    }
    Ok((file.nodes, file.pods))
}

async fn modified(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.and_then(|m| m.modified()).ok()
}

/// Error slot of this source in the store.
const ORIGIN: &str = "fixture";

/// Re-read `path` whenever its modification time changes. A file that
/// fails to parse keeps the previous contents on screen and reports
/// the error.
async fn poll_file(
    path: PathBuf,
    interval: Duration,
    mut last: Option<SystemTime>,
    store: EntityStore,
    notifier: ChangeNotifier,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let current = modified(&path).await;
        if current == last {
            continue;
        }
        last = current;
        match load(&path).await {
            Ok((nodes, pods)) => {
                tracing::debug!(nodes = nodes.len(), pods = pods.len(), "fixture reloaded");
                store.replace_all(nodes, pods);
                store.clear_error(ORIGIN);
            }
            Err(err) => {
                tracing::warn!(error = %err, "fixture reload failed");
                store.set_error(ORIGIN, err.to_string());
            }
        }
        notifier.notify();
    }
}

#[async_trait]
impl ClusterSource for FixtureSource {
    fn describe(&self) -> String {
        format!("fixture {}", self.path.display())
    }

    async fn start(
        self: Box<Self>,
        store: EntityStore,
        notifier: ChangeNotifier,
    ) -> Result<SourceHandle, SourceError> {
        let stamp = modified(&self.path).await;
        let (nodes, pods) = load(&self.path).await?;
        tracing::info!(
            path = %self.path.display(),
            nodes = nodes.len(),
            pods = pods.len(),
            "fixture loaded"
        );
        store.replace_all(nodes, pods);

        let (mut handle, reporter) = SourceHandle::new(1);
        reporter.synced();
        notifier.notify();

        if let Some(interval) = self.poll {
            handle.push_task(tokio::spawn(poll_file(
                self.path, interval, stamp, store, notifier,
            )));
        }
        Ok(handle)
    }
}
