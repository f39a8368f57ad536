mod cli;

use crate::cli::{Command, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use detour_core::{FromPath, RedirectFilter, RedirectStore, SiteScope};
use detour_resolver::{ImportPolicy, Importer, ResolverConfig, ResolverService};
use detour_storage::{InMemoryRedirectStore, MySqlRedirectStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    detour_telemetry::init(config.log_format.into())?;

    info!(storage_backend = %config.storage, "starting detour");

    match config.storage {
        StorageBackendArg::InMemory => run(InMemoryRedirectStore::new(), config).await,
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlRedirectStore::connect(mysql_dsn).await?;
            store.ensure_schema().await?;
            run(store, config).await
        }
    }
}

async fn run<S: RedirectStore>(store: S, config: CLI) -> anyhow::Result<()> {
    if let Some(seed) = &config.seed {
        Importer::new(&store, ImportPolicy::Overwrite)
            .import_file(seed)
            .await
            .with_context(|| format!("failed to seed from {}", seed.display()))?;
    }

    match config.command {
        Command::Resolve {
            path,
            site,
            global_fallback,
        } => {
            let resolver_config = ResolverConfig::builder()
                .global_fallback(global_fallback)
                .build();
            let service = ResolverService::with_config(store, resolver_config);
            let resolution = service.resolve(&path, SiteScope::from(site)).await?;
            println!("{}", serde_json::to_string(&resolution)?);
        }
        Command::Import {
            file,
            skip_existing,
        } => {
            let policy = if skip_existing {
                ImportPolicy::Skip
            } else {
                ImportPolicy::Overwrite
            };
            let report = Importer::new(&store, policy)
                .import_file(&file)
                .await
                .with_context(|| format!("failed to import {}", file.display()))?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::List { search, site } => {
            let filter = RedirectFilter {
                text: search,
                site: site.map(SiteScope::from_raw),
            };
            for record in store.search(&filter).await? {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Command::Remove { from, site } => {
            let from = FromPath::parse(&from)?;
            let site = SiteScope::from(site);
            store.remove(site, &from).await?;
            info!(from = %from, site = %site, "removed redirect");
        }
    }

    Ok(())
}
