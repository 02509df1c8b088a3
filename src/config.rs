use std::time::Duration;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[clap(about = "Keeps Infinispan clusters in line with their Infinispan resources")]
pub struct Config {
    /// Namespace to watch for Infinispan resources
    #[clap(short, long, env = "WATCH_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Watch every namespace, ignoring --namespace
    #[clap(long, env = "WATCH_ALL_NAMESPACES")]
    pub all_namespaces: bool,

    /// Seconds before a reconciled instance is checked again
    #[clap(long, env = "RESYNC_SECONDS", default_value = "5")]
    pub resync_seconds: u64,

    /// Seconds before a failed reconciliation is retried
    #[clap(long, env = "ERROR_REQUEUE_SECONDS", default_value = "5")]
    pub error_requeue_seconds: u64,
}

impl Config {
    /// `None` when every namespace is watched.
    pub fn watch_namespace(&self) -> Option<&str> {
        if self.all_namespaces {
            None
        } else {
            Some(&self.namespace)
        }
    }

    pub fn resync(&self) -> Duration {
        Duration::from_secs(self.resync_seconds)
    }

    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_seconds)
    }
}
