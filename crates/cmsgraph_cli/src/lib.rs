//! Command-line interface for cmsgraph.
//!
//! # Usage
//!
//! ```bash
//! # Check a content model for dangling references
//! cmsgraph check --types types.json
//!
//! # Print the query generated for a content type
//! cmsgraph query Article --types types.json --multi --dam
//!
//! # Print the normalized response shape of a content type
//! cmsgraph shape Article --types types.json
//!
//! # Fetch published content by path
//! cmsgraph fetch /en/news/ --types types.json
//!
//! # Fetch preview content
//! cmsgraph preview --types types.json --key abc123 --token "$PREVIEW_TOKEN" --ctx edit
//! ```
//!
//! `fetch` and `preview` read the Graph URL and single key from
//! `--gateway`/`--single-key` or from `CMS_GRAPH_GATEWAY`/`CMS_GRAPH_SINGLE_KEY`.

use clap::{Parser, Subcommand};
use cmsgraph_query::{infer_shape, QueryBuilder, QueryKind};
use cmsgraph_schema::{ContentTypeDefinition, DisplayTemplateDefinition, SchemaRegistry};
use cmsgraph_sdk::{ClientConfig, GraphClient, PreviewParams, GATEWAY_ENV, SINGLE_KEY_ENV};
use colored::Colorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "cmsgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings for commands that talk to Graph.
#[derive(clap::Args, Debug)]
pub struct GraphArgs {
    /// Graph content endpoint URL
    #[arg(long, env = GATEWAY_ENV)]
    pub gateway: String,

    /// Graph single key
    #[arg(long, env = SINGLE_KEY_ENV, hide_env_values = true)]
    pub single_key: String,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check content type definitions for unresolved references
    Check {
        /// Content type definitions (JSON)
        #[arg(short, long)]
        types: PathBuf,
    },

    /// Print the GraphQL document generated for a content type
    Query {
        /// Content type key
        content_type: String,

        /// Content type definitions (JSON)
        #[arg(short, long)]
        types: PathBuf,

        /// Build the multi-item query
        #[arg(long)]
        multi: bool,

        /// Include DAM asset fragments
        #[arg(long)]
        dam: bool,
    },

    /// Print the normalized response shape of a content type
    Shape {
        /// Content type key
        content_type: String,

        /// Content type definitions (JSON)
        #[arg(short, long)]
        types: PathBuf,
    },

    /// Fetch published content by path
    Fetch {
        /// Content path, e.g. /en/about/
        path: String,

        /// Content type definitions (JSON)
        #[arg(short, long)]
        types: PathBuf,

        /// Restrict matches to this site URL
        #[arg(long)]
        host: Option<String>,

        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Fetch preview content
    Preview {
        /// Content type definitions (JSON)
        #[arg(short, long)]
        types: PathBuf,

        /// Content key
        #[arg(long)]
        key: String,

        /// Preview token
        #[arg(long)]
        token: String,

        /// Preview context (`edit` or `preview`)
        #[arg(long)]
        ctx: Option<String>,

        /// Content version
        #[arg(long)]
        ver: Option<String>,

        /// Locale
        #[arg(long)]
        loc: Option<String>,

        #[command(flatten)]
        graph: GraphArgs,
    },
}

/// A content model file: either a bare array of content types, or an object
/// with `contentTypes` and `displayTemplates`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypesFile {
    ContentTypes(Vec<ContentTypeDefinition>),
    #[serde(rename_all = "camelCase")]
    Model {
        #[serde(default)]
        content_types: Vec<ContentTypeDefinition>,
        #[serde(default)]
        display_templates: Vec<DisplayTemplateDefinition>,
    },
}

/// Loads a content model file into a registry.
pub fn load_registry(path: &Path) -> Result<SchemaRegistry, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let file: TypesFile = serde_json::from_str(&source)
        .map_err(|e| format!("invalid content types in {}: {e}", path.display()))?;

    let mut registry = SchemaRegistry::new();
    match file {
        TypesFile::ContentTypes(content_types) => registry.register(content_types)?,
        TypesFile::Model {
            content_types,
            display_templates,
        } => {
            registry.register(content_types)?;
            registry.register_display_templates(display_templates)?;
        }
    }
    debug!(path = %path.display(), types = registry.len(), "loaded content types");
    Ok(registry)
}

pub async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check { types } => check_types(&types, cli.verbose),
        Commands::Query {
            content_type,
            types,
            multi,
            dam,
        } => {
            let registry = load_registry(&types)?;
            let kind = if multi {
                QueryKind::MultiItem
            } else {
                QueryKind::SingleItem
            };
            let mut builder = QueryBuilder::new(&registry);
            let document = builder.build(kind, &content_type, dam)?;
            if cli.verbose {
                for name in builder.recursive_fragments() {
                    eprintln!("{} {} references itself", "Info:".blue(), name);
                }
            }
            println!("{document}");
            Ok(0)
        }
        Commands::Shape {
            content_type,
            types,
        } => {
            let registry = load_registry(&types)?;
            let shape = infer_shape(&registry, &content_type)?;
            println!("{}", serde_json::to_string_pretty(&shape)?);
            Ok(0)
        }
        Commands::Fetch {
            path,
            types,
            host,
            graph,
        } => {
            let client = connect(&graph, load_registry(&types)?)?;
            let items = client.get_content_by_path(&path, host.as_deref()).await?;
            if items.is_empty() {
                eprintln!("{} no content at {}", "Info:".blue(), path);
                return Ok(1);
            }
            println!("{}", serde_json::to_string_pretty(&items)?);
            Ok(0)
        }
        Commands::Preview {
            types,
            key,
            token,
            ctx,
            ver,
            loc,
            graph,
        } => {
            let client = connect(&graph, load_registry(&types)?)?;
            let params = PreviewParams {
                preview_token: token,
                key,
                ctx,
                ver,
                loc,
            };
            let item = client.get_preview_content(&params).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(0)
        }
    }
}

fn connect(
    args: &GraphArgs,
    registry: SchemaRegistry,
) -> Result<GraphClient, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::new(&args.gateway, &args.single_key);
    if let Some(seconds) = args.timeout {
        config = config.timeout(Duration::from_secs(seconds));
    }
    Ok(GraphClient::new(config, registry)?)
}

fn check_types(path: &Path, verbose: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = load_registry(path)?;
    if verbose {
        for content_type in registry.content_types() {
            println!(
                "{} {} ({})",
                "Found".blue(),
                content_type.key,
                content_type.base_type
            );
        }
    }

    let missing = registry.unresolved_references();
    if missing.is_empty() {
        println!(
            "{} {} content types in {}",
            "OK".green(),
            registry.len(),
            path.display()
        );
        return Ok(0);
    }

    eprintln!("{} unresolved content types", "Error".red().bold());
    for key in &missing {
        eprintln!("  {} {}", "-->".blue(), key);
    }
    Ok(1)
}
