use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;

use crate::crd::Infinispan;

/// NodePort service fronting the REST and management endpoints.
///
/// Only created once per instance: later changes to these ports or to the
/// selector are not rolled out to an existing service.
pub fn manifest(instance: &Infinispan) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(instance.name_any()),
            namespace: instance.namespace(),
            ..ObjectMeta::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("NodePort".to_owned()),
            ports: Some(vec![
                ServicePort {
                    name: Some("rest".to_owned()),
                    port: 8080,
                    ..ServicePort::default()
                },
                ServicePort {
                    name: Some("management".to_owned()),
                    port: 9990,
                    ..ServicePort::default()
                },
            ]),
            selector: Some(instance.labels()),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    }
}
