use clap::Parser;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, CustomResourceExt};
use serde_json::json;

use infinispan_operator::crd::{Infinispan, InfinispanSpec};

#[derive(Clone, Debug, Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Subcommand,

    #[clap(short, long, default_value = "default")]
    namespace: String,
}

#[derive(Clone, Debug, Parser)]
enum Subcommand {
    Create(CreateOpts),
    Scale(ScaleOpts),
    Delete(DeleteOpts),
    /// Print the Infinispan CRD as YAML
    Crd,
}

#[derive(Clone, Debug, Parser)]
struct CreateOpts {
    /// Name of the cluster
    name: String,

    /// Number of servers
    #[clap(short, long, default_value = "1")]
    size: u16,
}

#[derive(Clone, Debug, Parser)]
struct ScaleOpts {
    /// Name of the cluster
    name: String,

    /// Number of servers
    #[clap(short, long)]
    size: u16,
}

#[derive(Clone, Debug, Parser)]
struct DeleteOpts {
    /// Name of the cluster
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts: Opts = Opts::parse();

    if let Subcommand::Crd = opts.command {
        print!("{}", serde_yaml::to_string(&Infinispan::crd())?);
        return Ok(());
    }

    let client = Client::try_default().await?;
    let crd_api: Api<Infinispan> = Api::namespaced(client, &opts.namespace);

    match opts.command {
        Subcommand::Create(c) => {
            crd_api
                .create(
                    &PostParams::default(),
                    &Infinispan {
                        metadata: ObjectMeta {
                            name: Some(c.name.to_owned()),
                            ..ObjectMeta::default()
                        },
                        spec: InfinispanSpec {
                            size: i32::from(c.size),
                        },
                        status: None,
                    },
                )
                .await?;
        }
        Subcommand::Scale(c) => {
            let patch = json!({ "spec": { "size": c.size } });
            crd_api
                .patch(&c.name, &PatchParams::default(), &Patch::Merge(&patch))
                .await?;
        }
        Subcommand::Delete(c) => {
            crd_api.delete(&c.name, &Default::default()).await?;
        }
        Subcommand::Crd => {}
    }

    Ok(())
}
