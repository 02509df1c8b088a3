use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::{Resource, ResourceExt};
use log::warn;

use crate::crd::Infinispan;
use crate::error::Error;
use crate::reconcile::Reconciler;
use crate::store::ClusterStore;

/// A change to one `Infinispan` instance, carrying the full snapshot.
#[derive(Clone, Debug)]
pub struct Notification {
    pub instance: Arc<Infinispan>,
    pub deleted: bool,
}

impl Notification {
    /// An instance with a deletion timestamp is on its way out and counts as deleted.
    pub fn observe(instance: Arc<Infinispan>) -> Self {
        let deleted = instance.meta().deletion_timestamp.is_some();
        Notification { instance, deleted }
    }
}

pub struct ContextData<S> {
    pub reconciler: Reconciler<S>,
    /// Delay before an instance is looked at again after a clean pass.
    pub resync: Duration,
    /// Delay before a failed pass is retried.
    pub error_requeue: Duration,
}

impl<S: ClusterStore> ContextData<S> {
    pub fn new(store: S, resync: Duration, error_requeue: Duration) -> Self {
        ContextData {
            reconciler: Reconciler::new(store),
            resync,
            error_requeue,
        }
    }
}

pub async fn reconcile<S: ClusterStore>(
    instance: Arc<Infinispan>,
    context: Arc<ContextData<S>>,
) -> Result<Action, Error> {
    let notification = Notification::observe(instance);
    context
        .reconciler
        .reconcile(&notification.instance, notification.deleted)
        .await?;

    if notification.deleted {
        Ok(Action::await_change())
    } else {
        Ok(Action::requeue(context.resync))
    }
}

pub fn on_error<S>(instance: Arc<Infinispan>, error: &Error, context: Arc<ContextData<S>>) -> Action {
    warn!(
        "reconciliation of {}/{} failed: {}",
        instance.namespace().unwrap_or_default(),
        instance.name_any(),
        error
    );
    Action::requeue(context.error_requeue)
}
