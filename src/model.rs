/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Owner kind marking a pod as managed by a fleet-wide controller.
pub(crate) const FLEET_CONTROLLER_KIND: &str = "DaemonSet";

/// A cluster node: the parent entity drawn as a large box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) uid: String,
    pub(crate) created: DateTime<Utc>,
    /// Full structured object, dumped verbatim by the detail view.
    #[serde(default)]
    pub(crate) payload: Value,
}

/// Reference from a pod to the controller that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct OwnerRef {
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) name: String,
}

/// A pod: the child entity drawn as a small box inside its node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Pod {
    #[serde(default)]
    pub(crate) namespace: String,
    pub(crate) name: String,
    pub(crate) uid: String,
    pub(crate) created: DateTime<Utc>,
    /// Name of the node the pod is bound to. Empty while unscheduled.
    #[serde(default)]
    pub(crate) node_name: String,
    #[serde(default)]
    pub(crate) owners: Vec<OwnerRef>,
}

/// Color class of a pod box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PodClass {
    Default,
    FleetController,
}

impl Pod {
    /// Classify by scanning the owner references for the fleet
    /// controller marker.
    pub(crate) fn class(&self) -> PodClass {
        if self
            .owners
            .iter()
            .any(|owner| owner.kind == FLEET_CONTROLLER_KIND)
        {
            PodClass::FleetController
        } else {
            PodClass::Default
        }
    }

    /// Whether this pod is attached to `node`.
    pub(crate) fn is_on(&self, node: &Node) -> bool {
        self.node_name == node.name
    }
}

/// Total order used for every listing: creation time (second
/// precision) ascending, then uid ascending.
pub(crate) fn creation_order(
    a_created: &DateTime<Utc>,
    a_uid: &str,
    b_created: &DateTime<Utc>,
    b_uid: &str,
) -> Ordering {
    a_created
        .timestamp()
        .cmp(&b_created.timestamp())
        .then_with(|| a_uid.cmp(b_uid))
}

impl Node {
    pub(crate) fn order(&self, other: &Node) -> Ordering {
        creation_order(&self.created, &self.uid, &other.created, &other.uid)
    }
}

impl Pod {
    pub(crate) fn order(&self, other: &Pod) -> Ordering {
        creation_order(&self.created, &self.uid, &other.created, &other.uid)
    }
}

/// A node together with the pods bound to it, both in creation order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeView {
    pub(crate) node: Node,
    pub(crate) pods: Vec<Pod>,
}

/// Read-only projection of the store taken for one refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) nodes: Vec<NodeView>,
    /// Pods not bound to any listed node.
    pub(crate) unscheduled: usize,
    /// Last error reported by the data source, if any.
    pub(crate) error: Option<String>,
}

impl Snapshot {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&NodeView> {
        self.nodes.get(index)
    }

    pub(crate) fn pod_count(&self) -> usize {
        self.nodes.iter().map(|view| view.pods.len()).sum()
    }
}
