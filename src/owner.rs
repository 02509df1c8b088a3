use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};

use crate::crd::Infinispan;

/// Controlling reference pointing back at `owner`, so that deleting the
/// `Infinispan` resource cascades to everything carrying it.
pub fn controller_ref(owner: &Infinispan) -> OwnerReference {
    OwnerReference {
        api_version: Infinispan::api_version(&()).into_owned(),
        kind: Infinispan::kind(&()).into_owned(),
        name: owner.name_any(),
        uid: owner.uid().unwrap_or_default(),
        controller: Some(true),
        ..OwnerReference::default()
    }
}

/// Returns `existing` with the controlling reference to `owner` appended.
/// Prior entries are kept in order; the input is left untouched.
pub fn owned_by(existing: Option<&[OwnerReference]>, owner: &Infinispan) -> Vec<OwnerReference> {
    existing
        .unwrap_or_default()
        .iter()
        .cloned()
        .chain(std::iter::once(controller_ref(owner)))
        .collect()
}
