use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::runtime::watcher::Config;
use kube::runtime::Controller;
use kube::{Api, Client};

use infinispan_operator::config::Config as OperatorConfig;
use infinispan_operator::controller::{on_error, reconcile, ContextData};
use infinispan_operator::crd::Infinispan;
use infinispan_operator::store::KubeStore;

fn api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    K::DynamicType: Default,
{
    match namespace {
        Some(namespace) => Api::namespaced(client.clone(), namespace),
        None => Api::all(client.clone()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = OperatorConfig::parse();
    log::info!("infinispan-operator version {}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "watching {}",
        config.watch_namespace().unwrap_or("all namespaces")
    );

    let client = Client::try_default().await?;
    let namespace = config.watch_namespace();
    let context = Arc::new(ContextData::new(
        KubeStore::new(client.clone()),
        config.resync(),
        config.error_requeue(),
    ));

    Controller::new(api::<Infinispan>(&client, namespace), Config::default())
        .owns(api::<Deployment>(&client, namespace), Config::default())
        .owns(api::<Service>(&client, namespace), Config::default())
        .shutdown_on_signal()
        .run(reconcile, on_error, context)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok((instance, _action)) => {
                    log::debug!("Reconciliation successful. Resource: {:?}", instance);
                }
                Err(reconciliation_err) => {
                    log::warn!("Reconciliation error: {:?}", reconciliation_err)
                }
            }
        })
        .await;

    Ok(())
}
