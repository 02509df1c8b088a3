use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create deployment: {0}")]
    CreateDeployment(#[source] StoreError),
    #[error("failed to get deployment: {0}")]
    GetDeployment(#[source] StoreError),
    #[error("failed to update deployment: {0}")]
    UpdateDeployment(#[source] StoreError),
    #[error("failed to create service: {0}")]
    CreateService(#[source] StoreError),
    #[error("failed to list pods: {0}")]
    ListPods(#[source] StoreError),
    #[error("failed to update infinispan status: {0}")]
    UpdateStatus(#[source] StoreError),
    #[error("crd error: {0}")]
    UserInputError(String),
}
