//! pnp-map: build and query plug'n'play dependency maps.
//!
//! ## Commands
//!
//! - **build**: flatten a resolved dependency graph into a map snapshot
//! - **owner**: which package owns a file
//! - **resolve**: resolve a `require()` request as issued from a file
//! - **inspect**: summary of a snapshot
//!
//! ## Example Usage
//!
//! ```bash
//! pnp-map build --graph graph.json --seed left-pad@^1.0.0 --out pnp-map.json --project-root .
//! pnp-map owner --map pnp-map.json /store/left-pad-1.0.0/index.js
//! pnp-map resolve --map pnp-map.json --from "$PWD/index.js" left-pad
//! pnp-map inspect --map pnp-map.json --json
//! ```

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pnp_map::{BuildOptions, JsonGraphSource, MapBuilder, PnpResolver, Resolution, Snapshot};
use pnp_types::env_utils::{env_list, env_string_or};

#[derive(Parser)]
#[command(
    name = "pnp-map",
    author,
    version,
    about = "Build and query plug'n'play dependency maps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a map snapshot from a resolved dependency graph
    Build(BuildCmd),

    /// Print the package owning a file
    Owner(OwnerCmd),

    /// Resolve a package request as issued from a file
    Resolve(ResolveCmd),

    /// Summarize a map snapshot
    Inspect(InspectCmd),
}

#[derive(Args)]
struct BuildCmd {
    /// Resolved dependency graph (JSON)
    #[arg(long, value_name = "PATH")]
    graph: PathBuf,

    /// Top-level dependency pattern; repeatable (default: $PNP_MAP_SEEDS)
    #[arg(long = "seed", value_name = "PATTERN")]
    seeds: Vec<String>,

    /// Snapshot output path
    #[arg(long, value_name = "PATH")]
    out: PathBuf,

    /// Directory whose files are issued by the top-level project
    #[arg(long, value_name = "DIR")]
    project_root: Option<PathBuf>,

    /// Canonicalize locations lexically instead of resolving symlinks on disk
    #[arg(long)]
    no_resolve_symlinks: bool,

    /// Keep the last package when two share an install location
    #[arg(long)]
    allow_duplicate_locations: bool,
}

#[derive(Args)]
struct OwnerCmd {
    /// Map snapshot
    #[arg(long, value_name = "PATH")]
    map: PathBuf,

    /// File path to look up
    path: String,
}

#[derive(Args)]
struct ResolveCmd {
    /// Map snapshot
    #[arg(long, value_name = "PATH")]
    map: PathBuf,

    /// File issuing the request (omit for the top-level project)
    #[arg(long, value_name = "PATH")]
    from: Option<String>,

    /// Module request, e.g. `left-pad` or `@babel/core/lib/index`
    request: String,
}

#[derive(Args)]
struct InspectCmd {
    /// Map snapshot
    #[arg(long, value_name = "PATH")]
    map: PathBuf,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pnp_map=debug,pnp_resolver=debug".to_string()
    } else {
        env_string_or("PNP_MAP_LOG", "pnp_map=info")
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    match command {
        Commands::Build(cmd) => cmd.execute(json).await,
        Commands::Owner(cmd) => cmd.execute(json),
        Commands::Resolve(cmd) => cmd.execute(json),
        Commands::Inspect(cmd) => cmd.execute(json),
    }
}

impl BuildCmd {
    async fn execute(self, json: bool) -> Result<()> {
        let seeds = if self.seeds.is_empty() {
            env_list("PNP_MAP_SEEDS")
        } else {
            self.seeds
        };
        if seeds.is_empty() {
            bail!("No seed patterns given (use --seed or PNP_MAP_SEEDS)");
        }

        let mut options = BuildOptions::from_env();
        if let Some(root) = self.project_root {
            options.project_root = Some(root);
        }
        if self.no_resolve_symlinks {
            options.resolve_symlinks = false;
        }
        if self.allow_duplicate_locations {
            options.allow_duplicate_locations = true;
        }

        let graph = JsonGraphSource::load(&self.graph)?;
        let map = MapBuilder::new(options).build(&seeds, &graph).await?;
        let stats = map.stats();
        let snapshot = Snapshot::new(map)?;
        snapshot.save(&self.out)?;

        if json {
            println!(
                "{}",
                json!({
                    "out": self.out.display().to_string(),
                    "checksum": snapshot.checksum,
                    "stats": stats,
                })
            );
        } else {
            println!(
                "Wrote {} ({} packages, {} locations)",
                self.out.display(),
                stats.packages,
                stats.locations
            );
        }
        Ok(())
    }
}

impl OwnerCmd {
    fn execute(self, json: bool) -> Result<()> {
        let map = Snapshot::load(&self.map)?.into_map();
        let owner = map.find_owner(&self.path);
        if json {
            println!("{}", json!({ "path": self.path, "owner": owner }));
        } else {
            match owner {
                Some(locator) => println!("{}", locator),
                None => println!("No package owns {}", self.path),
            }
        }
        Ok(())
    }
}

impl ResolveCmd {
    fn execute(self, json: bool) -> Result<()> {
        let map = Snapshot::load(&self.map)?.into_map();
        let resolver = PnpResolver::new(Arc::new(map));

        match resolver.resolve_request(&self.request, self.from.as_deref()) {
            Ok(Resolution::Resolved { path, locator }) => {
                if json {
                    println!(
                        "{}",
                        json!({ "request": self.request, "path": path, "package": locator })
                    );
                } else {
                    println!("{}", path);
                }
                Ok(())
            }
            Ok(Resolution::Unmanaged) => {
                if json {
                    println!("{}", json!({ "request": self.request, "path": null }));
                } else {
                    println!("{} is a path request; not governed by the map", self.request);
                }
                Ok(())
            }
            Err(err) => {
                if json {
                    println!(
                        "{}",
                        json!({
                            "request": self.request,
                            "error": { "code": err.code(), "message": err.to_string() },
                        })
                    );
                }
                Err(err.into())
            }
        }
    }
}

impl InspectCmd {
    fn execute(self, json: bool) -> Result<()> {
        let snapshot = Snapshot::load(&self.map)?;
        let stats = snapshot.map.stats();
        if json {
            println!(
                "{}",
                json!({
                    "format_version": snapshot.format_version,
                    "checksum": snapshot.checksum,
                    "stats": stats,
                })
            );
        } else {
            println!("Snapshot: {}", self.map.display());
            println!("  Format version: {}", snapshot.format_version);
            println!("  Checksum: {}", snapshot.checksum);
            println!("  Packages: {}", stats.packages);
            println!("  Locations: {}", stats.locations);
            println!("  Top-level dependencies: {}", stats.top_level_dependencies);
            println!("  Prefix lengths (probe order): {:?}", stats.candidate_lengths);
        }
        Ok(())
    }
}
