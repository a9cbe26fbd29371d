/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::model::Node;
use crate::model::NodeView;
use crate::model::Pod;
use crate::model::Snapshot;

#[derive(Debug, Default)]
struct Entities {
    nodes: HashMap<String, Node>,
    pods: HashMap<String, Pod>,
    /// Last error per origin (a watched kind, or the fixture file).
    errors: BTreeMap<String, String>,
}

/// Shared cache of nodes and pods, keyed by uid.
///
/// Data sources write through the mutation methods; the UI only
/// reads ordered copies. Clones share the same cache.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntityStore {
    inner: Arc<RwLock<Entities>>,
}

impl EntityStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // A panicking writer cannot leave the maps half-updated (every
    // mutation is a single insert/remove/replace), so poisoning is
    // ignored.
    fn read(&self) -> RwLockReadGuard<'_, Entities> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entities> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // Mutation API.

    pub(crate) fn apply_node(&self, node: Node) {
        self.write().nodes.insert(node.uid.clone(), node);
    }

    pub(crate) fn delete_node(&self, uid: &str) {
        self.write().nodes.remove(uid);
    }

    pub(crate) fn apply_pod(&self, pod: Pod) {
        self.write().pods.insert(pod.uid.clone(), pod);
    }

    pub(crate) fn delete_pod(&self, uid: &str) {
        self.write().pods.remove(uid);
    }

    /// Replace every node (used when a watch relists).
    pub(crate) fn replace_nodes(&self, nodes: Vec<Node>) {
        self.write().nodes = nodes.into_iter().map(|n| (n.uid.clone(), n)).collect();
    }

    /// Replace every pod (used when a watch relists).
    pub(crate) fn replace_pods(&self, pods: Vec<Pod>) {
        self.write().pods = pods.into_iter().map(|p| (p.uid.clone(), p)).collect();
    }

    /// Replace the whole cache atomically.
    pub(crate) fn replace_all(&self, nodes: Vec<Node>, pods: Vec<Pod>) {
        let mut guard = self.write();
        guard.nodes = nodes.into_iter().map(|n| (n.uid.clone(), n)).collect();
        guard.pods = pods.into_iter().map(|p| (p.uid.clone(), p)).collect();
    }

    /// Record the latest failure of `origin`, replacing its previous
    /// one. Other origins keep theirs.
    pub(crate) fn set_error(&self, origin: &str, error: impl Into<String>) {
        self.write().errors.insert(origin.to_string(), error.into());
    }

    pub(crate) fn clear_error(&self, origin: &str) {
        self.write().errors.remove(origin);
    }

    /// Read access under a single guard. Every accessor called on the
    /// view sees the same cache state.
    pub(crate) fn view(&self) -> StoreView<'_> {
        StoreView { guard: self.read() }
    }

    /// Take a consistent, ordered projection of the whole cache.
    pub(crate) fn snapshot(&self) -> Snapshot {
        self.view().snapshot()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.read().nodes.len()
    }

    pub(crate) fn pod_count(&self) -> usize {
        self.read().pods.len()
    }
}

/// Consistent read view of an [`EntityStore`].
///
/// Every listing is sorted by creation time then uid, so identical
/// cache contents always produce identical output.
pub(crate) struct StoreView<'a> {
    guard: RwLockReadGuard<'a, Entities>,
}

impl StoreView<'_> {
    pub(crate) fn list_parents(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.guard.nodes.values().collect();
        nodes.sort_by(|a, b| a.order(b));
        nodes
    }

    pub(crate) fn list_children_of(&self, node: &Node) -> Vec<&Pod> {
        let mut pods: Vec<&Pod> = self
            .guard
            .pods
            .values()
            .filter(|pod| pod.is_on(node))
            .collect();
        pods.sort_by(|a, b| a.order(b));
        pods
    }

    /// Pods that are not on any known node.
    fn unscheduled(&self) -> usize {
        self.guard
            .pods
            .values()
            .filter(|pod| !self.guard.nodes.values().any(|node| pod.is_on(node)))
            .count()
    }

    fn error(&self) -> Option<String> {
        if self.guard.errors.is_empty() {
            return None;
        }
        Some(
            self.guard
                .errors
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let nodes = self
            .list_parents()
            .into_iter()
            .map(|node| NodeView {
                node: node.clone(),
                pods: self
                    .list_children_of(node)
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();
        Snapshot {
            nodes,
            unscheduled: self.unscheduled(),
            error: self.error(),
        }
    }
}
