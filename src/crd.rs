use std::collections::BTreeMap;

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Value of the `app` label carried by every object the operator manages.
pub const APP_LABEL_VALUE: &str = "infinispan";

/// Label naming the `Infinispan` resource an object belongs to.
pub const CR_LABEL: &str = "infinispan_cr";

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
group = "infinispan.banzaicloud.com",
version = "v1alpha1",
kind = "Infinispan",
plural = "infinispans",
status = "InfinispanStatus",
derive = "PartialEq",
namespaced
)]
pub struct InfinispanSpec {
    /// Desired number of server replicas.
    #[schemars(range(min = 0))]
    pub size: i32,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
pub struct InfinispanStatus {
    /// Names of the pods currently selected by the instance labels.
    #[serde(default)]
    pub nodes: Vec<String>,
}

impl Infinispan {
    /// Label set shared by the deployment, its pods and the service selector.
    pub fn labels(&self) -> BTreeMap<String, String> {
        labels_for(&self.name_any())
    }

    /// The label set rendered as a list selector, e.g. `app=infinispan,infinispan_cr=cache1`.
    pub fn label_selector(&self) -> String {
        self.labels()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Worker names last written to the status, empty when no status exists yet.
    pub fn nodes(&self) -> &[String] {
        self.status
            .as_ref()
            .map(|status| status.nodes.as_slice())
            .unwrap_or_default()
    }
}

pub fn labels_for(name: &str) -> BTreeMap<String, String> {
    let mut labels: BTreeMap<String, String> = BTreeMap::new();
    labels.insert("app".to_owned(), APP_LABEL_VALUE.to_owned());
    labels.insert(CR_LABEL.to_owned(), name.to_owned());
    labels
}
