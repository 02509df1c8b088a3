use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use log::{debug, info};

use crate::crd::{Infinispan, InfinispanStatus};
use crate::error::Error;
use crate::store::ClusterStore;

/// Pod names in the order the store listed them.
pub fn pod_names(pods: &[Pod]) -> Vec<String> {
    pods.iter().map(|pod| pod.name_any()).collect()
}

/// Order-sensitive comparison: two node lists match only when they have the
/// same length and the same name at every position. A reordered listing of
/// the same pods does not match.
pub fn nodes_match(observed: &[String], stored: &[String]) -> bool {
    observed.len() == stored.len() && observed.iter().zip(stored).all(|(a, b)| a == b)
}

/// Recomputes the worker set of `instance` and writes it to the status
/// subresource when it differs from what is stored. Returns whether a write
/// was made.
pub async fn sync_status<S>(store: &S, instance: &Infinispan, namespace: &str) -> Result<bool, Error>
where
    S: ClusterStore + ?Sized,
{
    let pods = store
        .list_pods(namespace, &instance.label_selector())
        .await
        .map_err(Error::ListPods)?;
    let nodes = pod_names(&pods);

    if nodes_match(&nodes, instance.nodes()) {
        debug!("status of {}/{} is current", namespace, instance.name_any());
        return Ok(false);
    }

    info!(
        "updating status of {}/{}: {:?} -> {:?}",
        namespace,
        instance.name_any(),
        instance.nodes(),
        nodes
    );
    let mut updated = instance.clone();
    updated.status = Some(InfinispanStatus { nodes });
    store
        .replace_status(&updated)
        .await
        .map_err(Error::UpdateStatus)?;
    Ok(true)
}
