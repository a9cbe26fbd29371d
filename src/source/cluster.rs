/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Live Kubernetes source: one watcher per kind.

use std::fmt::Debug;
use std::path::PathBuf;
use std::pin::pin;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use futures::StreamExt;
use k8s_openapi::api::core::v1 as k8s;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Api;
use kube::Client;
use kube::Config;
use kube::Resource;
use kube::ResourceExt;
use kube::config::KubeConfigOptions;
use kube::config::Kubeconfig;
use kube::runtime::WatchStreamExt;
use kube::runtime::watcher;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ClusterSource;
use super::SourceError;
use super::SourceHandle;
use super::SyncReporter;
use crate::bridge::ChangeNotifier;
use crate::model::Node;
use crate::model::OwnerRef;
use crate::model::Pod;
use crate::store::EntityStore;

/// Watches nodes and pods cluster-wide.
#[derive(Debug)]
pub(crate) struct KubeSource {
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
}

impl KubeSource {
    pub(crate) fn new(kubeconfig: Option<PathBuf>, context: Option<String>) -> Self {
        Self {
            kubeconfig,
            context,
        }
    }

    fn options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            ..Default::default()
        }
    }

    async fn client(&self) -> Result<Client, SourceError> {
        let config = match (&self.kubeconfig, &self.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(kubeconfig, &self.options()).await?
            }
            (None, Some(_)) => Config::from_kubeconfig(&self.options()).await?,
            (None, None) => Config::infer().await?,
        };
        tracing::debug!(cluster_url = %config.cluster_url, "cluster config resolved");
        Ok(Client::try_from(config)?)
    }
}

#[async_trait]
impl ClusterSource for KubeSource {
    fn describe(&self) -> String {
        let context = self.context.as_deref().unwrap_or("current context");
        match &self.kubeconfig {
            Some(path) => format!("{} ({})", context, path.display()),
            None => context.to_string(),
        }
    }

    async fn start(
        self: Box<Self>,
        store: EntityStore,
        notifier: ChangeNotifier,
    ) -> Result<SourceHandle, SourceError> {
        let client = self.client().await?;
        // Probe once so an unreachable or unauthorized cluster fails
        // startup rather than the watchers.
        let version = client.apiserver_version().await?;
        tracing::info!(
            major = %version.major,
            minor = %version.minor,
            "connected to cluster"
        );

        let (mut handle, reporter) = SourceHandle::new(2);
        handle.push_task(tokio::spawn(mirror::<k8s::Node>(
            client.clone(),
            store.clone(),
            notifier.clone(),
            reporter.clone(),
        )));
        handle.push_task(tokio::spawn(mirror::<k8s::Pod>(
            client, store, notifier, reporter,
        )));
        Ok(handle)
    }
}

/// A watched Kubernetes kind and how it lands in the store.
trait Mirror: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + 'static {
    type Entity: Send;
    const KIND: &'static str;

    fn convert(self) -> Option<Self::Entity>;
    fn apply(store: &EntityStore, entity: Self::Entity);
    fn delete(store: &EntityStore, uid: &str);
    fn replace(store: &EntityStore, entities: Vec<Self::Entity>);
}

/// Identity fields every entity needs. Objects without a uid or
/// name are skipped.
fn identity(meta: &ObjectMeta) -> Option<(String, String, DateTime<Utc>)> {
    let uid = meta.uid.clone()?;
    let name = meta.name.clone()?;
    let created = meta
        .creation_timestamp
        .as_ref()
        .map(|time| time.0)
        .unwrap_or_default();
    Some((uid, name, created))
}

impl Mirror for k8s::Node {
    type Entity = Node;
    const KIND: &'static str = "node";

    fn convert(mut self) -> Option<Node> {
        let Some((uid, name, created)) = identity(&self.metadata) else {
            tracing::debug!(name = ?self.metadata.name, "skipping node without identity");
            return None;
        };
        self.metadata.managed_fields = None;
        let payload = serde_json::to_value(&self).unwrap_or_else(|err| {
            tracing::warn!(node = %name, error = %err, "node payload not serializable");
            Value::Null
        });
        Some(Node {
            name,
            uid,
            created,
            payload,
        })
    }

    fn apply(store: &EntityStore, node: Node) {
        store.apply_node(node);
    }

    fn delete(store: &EntityStore, uid: &str) {
        store.delete_node(uid);
    }

    fn replace(store: &EntityStore, nodes: Vec<Node>) {
        store.replace_nodes(nodes);
    }
}

impl Mirror for k8s::Pod {
    type Entity = Pod;
    const KIND: &'static str = "pod";

    fn convert(self) -> Option<Pod> {
        let Some((uid, name, created)) = identity(&self.metadata) else {
            tracing::debug!(name = ?self.metadata.name, "skipping pod without identity");
            return None;
        };
        let owners = self
            .metadata
            .owner_references
            .unwrap_or_default()
            .into_iter()
            .map(|owner| OwnerRef {
                kind: owner.kind,
                name: owner.name,
            })
            .collect();
        Some(Pod {
            namespace: self.metadata.namespace.unwrap_or_default(),
            name,
            uid,
            created,
            node_name: self.spec.and_then(|spec| spec.node_name).unwrap_or_default(),
            owners,
        })
    }

    fn apply(store: &EntityStore, pod: Pod) {
        store.apply_pod(pod);
    }

    fn delete(store: &EntityStore, uid: &str) {
        store.delete_pod(uid);
    }

    fn replace(store: &EntityStore, pods: Vec<Pod>) {
        store.replace_pods(pods);
    }
}

/// Watch progress of one kind, carried between events.
#[derive(Debug)]
struct WatchState<E> {
    /// Relist being buffered between `Init` and `InitDone`.
    listing: Vec<E>,
    synced: bool,
}

impl<E> Default for WatchState<E> {
    fn default() -> Self {
        Self {
            listing: Vec::new(),
            synced: false,
        }
    }
}

/// Mirror one kind into the store until the task is aborted.
async fn mirror<K: Mirror>(
    client: Client,
    store: EntityStore,
    notifier: ChangeNotifier,
    reporter: SyncReporter,
) {
    let api: Api<K> = Api::all(client);
    let mut stream = pin!(watcher(api, watcher::Config::default()).default_backoff());
    let mut state = WatchState::default();
    while let Some(event) = stream.next().await {
        handle_event::<K>(event, &mut state, &store, &notifier, &reporter);
    }
    tracing::info!(kind = K::KIND, "watch stream ended");
}

/// Apply one watch event to the store.
///
/// Initial listings (and relists after a desync) are buffered and
/// swapped in whole at `InitDone`, so entities deleted while the
/// watch was down disappear. A stream error is recorded under the
/// kind; the next successful event of the same kind clears it.
fn handle_event<K: Mirror>(
    event: Result<watcher::Event<K>, watcher::Error>,
    state: &mut WatchState<K::Entity>,
    store: &EntityStore,
    notifier: &ChangeNotifier,
    reporter: &SyncReporter,
) {
    match event {
        Ok(watcher::Event::Apply(object)) => {
            if let Some(entity) = object.convert() {
                K::apply(store, entity);
                store.clear_error(K::KIND);
                notifier.notify();
            }
        }
        Ok(watcher::Event::Delete(object)) => {
            if let Some(uid) = object.uid() {
                K::delete(store, &uid);
                store.clear_error(K::KIND);
                notifier.notify();
            }
        }
        Ok(watcher::Event::Init) => {
            tracing::debug!(kind = K::KIND, "listing started");
            state.listing.clear();
        }
        Ok(watcher::Event::InitApply(object)) => {
            state.listing.extend(object.convert());
        }
        Ok(watcher::Event::InitDone) => {
            tracing::debug!(kind = K::KIND, count = state.listing.len(), "listing done");
            K::replace(store, std::mem::take(&mut state.listing));
            store.clear_error(K::KIND);
            if !state.synced {
                state.synced = true;
                reporter.synced();
            }
            notifier.notify();
        }
        Err(err) => {
            tracing::warn!(kind = K::KIND, error = %err, "watch stream error");
            store.set_error(K::KIND, format!("{} watch: {}", K::KIND, err));
            notifier.notify();
        }
    }
}
