use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;

use crate::crd::Infinispan;
use crate::owner::owned_by;
use crate::{deployment, service};

/// Secondary resources realizing one `Infinispan` instance.
pub type InfinispanResources = (Deployment, Service);

/// Desired deployment and service for `instance`, both carrying a
/// controlling owner reference to it.
pub fn desired(instance: &Infinispan) -> InfinispanResources {
    let mut dep = deployment::manifest(instance);
    dep.metadata.owner_references = Some(owned_by(
        dep.metadata.owner_references.as_deref(),
        instance,
    ));

    let mut svc = service::manifest(instance);
    svc.metadata.owner_references = Some(owned_by(
        svc.metadata.owner_references.as_deref(),
        instance,
    ));

    (dep, svc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::InfinispanSpec;
    use crate::owner::controller_ref;

    #[test]
    fn every_manifest_has_one_controller_ref() {
        let mut cache = Infinispan::new("cache1", InfinispanSpec { size: 3 });
        cache.metadata.namespace = Some("default".to_owned());
        cache.metadata.uid = Some("uid-1".to_owned());

        let (dep, svc) = desired(&cache);

        for refs in [dep.metadata.owner_references, svc.metadata.owner_references] {
            let refs = refs.unwrap();
            let controllers: Vec<_> = refs
                .iter()
                .filter(|r| r.controller == Some(true))
                .collect();
            assert_eq!(controllers.len(), 1);
            assert_eq!(*controllers[0], controller_ref(&cache));
        }
    }
}
