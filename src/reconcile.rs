use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;
use log::{debug, info};

use crate::cluster;
use crate::crd::Infinispan;
use crate::error::Error;
use crate::status;
use crate::store::ClusterStore;

/// Drives the deployment, service and status of one `Infinispan` instance
/// toward its spec. Holds no state between passes.
pub struct Reconciler<S> {
    store: S,
}

impl<S: ClusterStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Reconciler { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One pass: ensure the deployment, scale it, ensure the service, sync
    /// the status. Deleted instances are left to garbage collection through
    /// their owner references. The first failing stage ends the pass.
    pub async fn reconcile(&self, instance: &Infinispan, deleted: bool) -> Result<(), Error> {
        if deleted {
            debug!("ignoring deleted infinispan {}", instance.name_any());
            return Ok(());
        }
        let namespace = instance.namespace().ok_or_else(|| {
            Error::UserInputError("Expected Infinispan resource to be namespaced.".to_owned())
        })?;
        let name = instance.name_any();

        let (dep, svc) = cluster::desired(instance);

        self.ensure_deployment(&dep).await?;
        self.ensure_size(&namespace, &name, instance.spec.size).await?;
        self.ensure_service(&svc).await?;
        status::sync_status(&self.store, instance, &namespace).await?;

        Ok(())
    }

    async fn ensure_deployment(&self, dep: &Deployment) -> Result<(), Error> {
        match self.store.create_deployment(dep).await {
            Ok(()) => {
                info!("created deployment {}", dep.name_any());
                Ok(())
            }
            Err(err) if err.is_already_exists() => Ok(()),
            Err(err) => Err(Error::CreateDeployment(err)),
        }
    }

    async fn ensure_size(&self, namespace: &str, name: &str, size: i32) -> Result<(), Error> {
        let mut live = self
            .store
            .get_deployment(namespace, name)
            .await
            .map_err(Error::GetDeployment)?;

        let replicas = live.spec.as_ref().and_then(|spec| spec.replicas);
        if replicas == Some(size) {
            debug!("deployment {namespace}/{name} already has {size} replicas");
            return Ok(());
        }

        info!("scaling deployment {namespace}/{name} from {replicas:?} to {size}");
        live.spec.get_or_insert_with(Default::default).replicas = Some(size);
        self.store
            .replace_deployment(&live)
            .await
            .map_err(Error::UpdateDeployment)
    }

    async fn ensure_service(&self, svc: &Service) -> Result<(), Error> {
        match self.store.create_service(svc).await {
            Ok(()) => {
                info!("created service {}", svc.name_any());
                Ok(())
            }
            Err(err) if err.is_already_exists() => Ok(()),
            Err(err) => Err(Error::CreateService(err)),
        }
    }
}
