use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{ListParams, PostParams};
use kube::error::ErrorResponse;
use kube::{Api, Client, Resource, ResourceExt};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::crd::Infinispan;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("missing object key: {0}")]
    MissingObjectKey(&'static str),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("k8s error: {0}")]
    Kube(#[source] kube::Error),
}

impl StoreError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ErrorResponse { reason, message, .. }) if reason == "AlreadyExists" => {
                StoreError::AlreadyExists(message)
            }
            kube::Error::Api(ErrorResponse { reason, message, .. }) if reason == "NotFound" => {
                StoreError::NotFound(message)
            }
            other => StoreError::Kube(other),
        }
    }
}

/// The cluster calls a reconcile pass is allowed to make.
///
/// Objects carry their own namespace; creation of an object that is already
/// present must surface as [`StoreError::AlreadyExists`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterStore: Send + Sync {
    async fn create_deployment(&self, deployment: &Deployment) -> Result<(), StoreError>;

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, StoreError>;

    async fn replace_deployment(&self, deployment: &Deployment) -> Result<(), StoreError>;

    async fn create_service(&self, service: &Service) -> Result<(), StoreError>;

    async fn list_pods(&self, namespace: &str, selector: &str) -> Result<Vec<Pod>, StoreError>;

    /// Writes `instance.status` through the status subresource.
    async fn replace_status(&self, instance: &Infinispan) -> Result<(), StoreError>;
}

/// [`ClusterStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        KubeStore { client }
    }

    fn api<K>(&self, object: &K) -> Result<Api<K>, StoreError>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        let namespace = object
            .meta()
            .namespace
            .as_deref()
            .ok_or(StoreError::MissingObjectKey(".metadata.namespace"))?;
        Ok(Api::namespaced(self.client.clone(), namespace))
    }
}

fn name_of<K: Resource>(object: &K) -> Result<&str, StoreError> {
    object
        .meta()
        .name
        .as_deref()
        .ok_or(StoreError::MissingObjectKey(".metadata.name"))
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn create_deployment(&self, deployment: &Deployment) -> Result<(), StoreError> {
        self.api(deployment)?
            .create(&PostParams::default(), deployment)
            .await?;
        Ok(())
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, StoreError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn replace_deployment(&self, deployment: &Deployment) -> Result<(), StoreError> {
        self.api(deployment)?
            .replace(name_of(deployment)?, &PostParams::default(), deployment)
            .await?;
        Ok(())
    }

    async fn create_service(&self, service: &Service) -> Result<(), StoreError> {
        self.api(service)?
            .create(&PostParams::default(), service)
            .await?;
        Ok(())
    }

    async fn list_pods(&self, namespace: &str, selector: &str) -> Result<Vec<Pod>, StoreError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = api.list(&ListParams::default().labels(selector)).await?;
        Ok(pods.items)
    }

    async fn replace_status(&self, instance: &Infinispan) -> Result<(), StoreError> {
        let name = instance.name_any();
        self.api(instance)?
            .replace_status(&name, &PostParams::default(), serde_json::to_vec(instance)?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_owned(),
            message: format!("{reason} happened"),
            reason: reason.to_owned(),
            code,
        })
    }

    #[test]
    fn classifies_already_exists() {
        let err = StoreError::from(api_error(409, "AlreadyExists"));
        assert!(err.is_already_exists());
        assert_eq!(err.to_string(), "already exists: AlreadyExists happened");
    }

    #[test]
    fn classifies_not_found() {
        let err = StoreError::from(api_error(404, "NotFound"));
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn update_conflicts_are_not_already_exists() {
        let err = StoreError::from(api_error(409, "Conflict"));
        assert!(!err.is_already_exists());
        assert!(matches!(err, StoreError::Kube(_)));
    }
}
