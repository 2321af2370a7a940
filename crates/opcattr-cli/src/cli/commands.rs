use super::render::{self, ReadRow};
use super::setup::{Cli, Commands, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::Parser;
use opcattr::api::{self, AttributeApi};
use opcattr::attributes::{DataValue, Variant};
use opcattr::config::ServerConfig;
use opcattr::model::NodeId;
use opcattr::store::memory::MemoryNodeStore;
use opcattr::store::{nodeset, sample};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Attrs => attrs(cli.output),
        Commands::Init { force } => init(&cli, *force),
        Commands::Read {
            node_id,
            attributes,
        } => read(&cli, node_id, attributes),
        Commands::Write {
            node_id,
            attribute,
            value,
        } => write(&cli, node_id, attribute, value),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("OPCATTR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // A second init in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_api(cli: &Cli) -> Result<AttributeApi<MemoryNodeStore>> {
    let config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let store = nodeset::load(&cli.nodeset)
        .with_context(|| format!("loading node set {}", cli.nodeset.display()))?;
    debug!(nodes = store.len(), ?config, "node set loaded");
    Ok(AttributeApi::new(store, config))
}

fn parse_node_id(raw: &str) -> Result<NodeId> {
    Ok(raw.parse::<NodeId>()?)
}

fn attrs(output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => print!("{}", render::attributes_text()),
        OutputFormat::Json => println!("{}", render::attributes_json()?),
    }
    Ok(())
}

fn init(cli: &Cli, force: bool) -> Result<()> {
    if cli.nodeset.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            cli.nodeset.display()
        );
    }
    let store = sample::sample_store()?;
    nodeset::save(&store, &cli.nodeset)
        .with_context(|| format!("writing node set {}", cli.nodeset.display()))?;
    info!(path = %cli.nodeset.display(), "sample node set written");
    println!(
        "Initialized {} with {} nodes",
        cli.nodeset.display(),
        store.len()
    );
    Ok(())
}

fn read(cli: &Cli, node_id: &str, attributes: &[String]) -> Result<()> {
    let node_id = parse_node_id(node_id)?;
    let api = open_api(cli)?;

    let response = api.read_attributes(&node_id, attributes)?;
    let service_result = response.response_header.service_result;
    if !service_result.is_good() {
        bail!("read rejected: {}", service_result);
    }
    let ids = attributes
        .iter()
        .map(|attr| api::parse_attribute(attr))
        .collect::<opcattr::error::Result<Vec<u32>>>()?;
    let rows: Vec<ReadRow> = ids
        .into_iter()
        .zip(response.results)
        .map(|(id, result)| ReadRow::new(id, result))
        .collect();

    match cli.output {
        OutputFormat::Text => print!("{}", render::read_text(&node_id, &rows)),
        OutputFormat::Json => println!("{}", render::read_json(&rows)?),
    }
    Ok(())
}

fn write(cli: &Cli, node_id: &str, attribute: &str, value: &str) -> Result<()> {
    let node_id = parse_node_id(node_id)?;
    let attribute_id = api::parse_attribute(attribute)?;
    let variant: Variant = serde_json::from_str(value)
        .with_context(|| format!("parsing variant JSON {}", value))?;
    let api = open_api(cli)?;

    let status = api.write_attribute(&node_id, attribute, DataValue::from_variant(variant))?;
    match cli.output {
        OutputFormat::Text => print!("{}", render::write_text(&node_id, attribute_id, status)),
        OutputFormat::Json => println!("{}", render::write_json(&node_id, attribute_id, status)?),
    }

    if !status.is_good() {
        bail!("write rejected: {}", status);
    }
    nodeset::save(api.store(), &cli.nodeset)
        .with_context(|| format!("saving node set {}", cli.nodeset.display()))?;
    Ok(())
}
