use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment,
};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, ExecAction, ObjectFieldSelector, PodSpec,
    PodTemplateSpec, Probe,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;

use crate::crd::Infinispan;

pub const IMAGE: &str = "jboss/infinispan-server:latest";
pub const CONTAINER_NAME: &str = "infinispan-server";

const PORTS: [(&str, i32); 7] = [
    ("websocket", 8181),
    ("management", 9990),
    ("memcached", 11211),
    ("hotrod", 11222),
    ("jgroups", 7600),
    ("jgroups-fd", 57600),
    ("rest", 8080),
];

const CREDENTIALS: [(&str, &str); 4] = [
    ("APP_USER", "user"),
    ("APP_PASS", "changeme"),
    ("MGMT_USER", "admin"),
    ("MGMT_PASS", "admin"),
];

/// Deployment running `spec.size` Infinispan servers. Owner references are
/// left empty; see [`crate::cluster::desired`].
pub fn manifest(instance: &Infinispan) -> Deployment {
    let labels = instance.labels();

    Deployment {
        metadata: ObjectMeta {
            name: Some(instance.name_any()),
            namespace: instance.namespace(),
            ..ObjectMeta::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(instance.spec.size),
            strategy: Some(DeploymentStrategy {
                type_: Some("RollingUpdate".to_owned()),
                rolling_update: Some(RollingUpdateDeployment {
                    max_unavailable: Some(IntOrString::Int(1)),
                    max_surge: Some(IntOrString::Int(1)),
                }),
            }),
            selector: LabelSelector {
                match_expressions: None,
                match_labels: Some(labels.clone()),
            },
            template: PodTemplateSpec {
                spec: Some(PodSpec {
                    containers: vec![server_container()],
                    ..PodSpec::default()
                }),
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..ObjectMeta::default()
                }),
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    }
}

fn server_container() -> Container {
    Container {
        name: CONTAINER_NAME.to_owned(),
        image: Some(IMAGE.to_owned()),
        ports: Some(
            PORTS
                .iter()
                .map(|(name, port)| ContainerPort {
                    name: Some((*name).to_owned()),
                    container_port: *port,
                    ..ContainerPort::default()
                })
                .collect(),
        ),
        env: Some(env()),
        liveness_probe: Some(exec_probe("/usr/local/bin/is_running.sh", 80, 60, 1)),
        readiness_probe: Some(exec_probe("/usr/local/bin/is_healthy.sh", 40, 30, 2)),
        ..Container::default()
    }
}

fn env() -> Vec<EnvVar> {
    let namespace = EnvVar {
        name: "KUBERNETES_NAMESPACE".to_owned(),
        value: None,
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                api_version: Some("v1".to_owned()),
                field_path: "metadata.namespace".to_owned(),
            }),
            ..EnvVarSource::default()
        }),
    };

    std::iter::once(namespace)
        .chain(CREDENTIALS.iter().map(|(name, value)| EnvVar {
            name: (*name).to_owned(),
            value: Some((*value).to_owned()),
            ..EnvVar::default()
        }))
        .collect()
}

// Both probes share the initial delay and failure threshold.
fn exec_probe(script: &str, timeout: i32, period: i32, success: i32) -> Probe {
    Probe {
        exec: Some(ExecAction {
            command: Some(vec![script.to_owned()]),
        }),
        initial_delay_seconds: Some(10),
        timeout_seconds: Some(timeout),
        period_seconds: Some(period),
        success_threshold: Some(success),
        failure_threshold: Some(5),
        ..Probe::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::InfinispanSpec;

    fn cache(size: i32) -> Infinispan {
        let mut cache = Infinispan::new("cache1", InfinispanSpec { size });
        cache.metadata.namespace = Some("caches".to_owned());
        cache
    }

    fn container(dep: &Deployment) -> &Container {
        &dep.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
    }

    #[test]
    fn identity_and_replicas_follow_instance() {
        let dep = manifest(&cache(3));

        assert_eq!(dep.metadata.name.as_deref(), Some("cache1"));
        assert_eq!(dep.metadata.namespace.as_deref(), Some("caches"));
        assert_eq!(dep.spec.as_ref().unwrap().replicas, Some(3));
        assert_eq!(manifest(&cache(0)).spec.unwrap().replicas, Some(0));
    }

    #[test]
    fn selector_and_pod_labels_match() {
        let instance = cache(3);
        let spec = manifest(&instance).spec.unwrap();

        assert_eq!(spec.selector.match_labels, Some(instance.labels()));
        assert_eq!(spec.template.metadata.unwrap().labels, Some(instance.labels()));
    }

    #[test]
    fn rolling_update_is_bounded() {
        let strategy = manifest(&cache(3)).spec.unwrap().strategy.unwrap();
        let rolling = strategy.rolling_update.unwrap();

        assert_eq!(strategy.type_.as_deref(), Some("RollingUpdate"));
        assert_eq!(rolling.max_unavailable, Some(IntOrString::Int(1)));
        assert_eq!(rolling.max_surge, Some(IntOrString::Int(1)));
    }

    #[test]
    fn container_exposes_seven_named_ports() {
        let dep = manifest(&cache(3));
        let c = container(&dep);

        assert_eq!(c.name, "infinispan-server");
        assert_eq!(c.image.as_deref(), Some("jboss/infinispan-server:latest"));
        let ports: Vec<(String, i32)> = c
            .ports
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| (p.name.clone().unwrap(), p.container_port))
            .collect();
        assert_eq!(
            ports,
            vec![
                ("websocket".to_owned(), 8181),
                ("management".to_owned(), 9990),
                ("memcached".to_owned(), 11211),
                ("hotrod".to_owned(), 11222),
                ("jgroups".to_owned(), 7600),
                ("jgroups-fd".to_owned(), 57600),
                ("rest".to_owned(), 8080),
            ]
        );
    }

    #[test]
    fn namespace_env_comes_from_pod_metadata() {
        let dep = manifest(&cache(3));
        let env = container(&dep).env.as_ref().unwrap();

        assert_eq!(env.len(), 5);
        assert_eq!(env[0].name, "KUBERNETES_NAMESPACE");
        assert_eq!(env[0].value, None);
        let field_ref = env[0].value_from.as_ref().unwrap().field_ref.as_ref().unwrap();
        assert_eq!(field_ref.field_path, "metadata.namespace");
        assert_eq!(field_ref.api_version.as_deref(), Some("v1"));

        let fixed: Vec<(&str, Option<&str>)> = env[1..]
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_deref()))
            .collect();
        assert_eq!(
            fixed,
            vec![
                ("APP_USER", Some("user")),
                ("APP_PASS", Some("changeme")),
                ("MGMT_USER", Some("admin")),
                ("MGMT_PASS", Some("admin")),
            ]
        );
    }

    #[test]
    fn probes_use_exec_checks() {
        let dep = manifest(&cache(3));
        let c = container(&dep);

        let liveness = c.liveness_probe.as_ref().unwrap();
        assert_eq!(
            liveness.exec.as_ref().unwrap().command,
            Some(vec!["/usr/local/bin/is_running.sh".to_owned()])
        );
        assert_eq!(liveness.initial_delay_seconds, Some(10));
        assert_eq!(liveness.timeout_seconds, Some(80));
        assert_eq!(liveness.period_seconds, Some(60));
        assert_eq!(liveness.success_threshold, Some(1));
        assert_eq!(liveness.failure_threshold, Some(5));

        let readiness = c.readiness_probe.as_ref().unwrap();
        assert_eq!(
            readiness.exec.as_ref().unwrap().command,
            Some(vec!["/usr/local/bin/is_healthy.sh".to_owned()])
        );
        assert_eq!(readiness.initial_delay_seconds, Some(10));
        assert_eq!(readiness.timeout_seconds, Some(40));
        assert_eq!(readiness.period_seconds, Some(30));
        assert_eq!(readiness.success_threshold, Some(2));
        assert_eq!(readiness.failure_threshold, Some(5));
    }

    #[test]
    fn building_is_deterministic() {
        assert_eq!(manifest(&cache(4)), manifest(&cache(4)));
    }
}
