use anyhow::{Context, Result};
use bagit_core::{Bag, BagReader, Manifest, MetadataPrecedence, ReadOptions};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "bagit", version, about = "Read and inspect BagIt bags")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Read a bag and summarise its version, manifests, metadata and fetch list
    Read {
        root: PathBuf,
        /// JSON file with reader options
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        check_fetch_containment: bool,
        /// Use bag-info.txt when package-info.txt is also present
        #[arg(long, default_value_t = false)]
        prefer_bag_info: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Read { root, config, check_fetch_containment, prefer_bag_info, json } => {
            let mut options = load_options(config.as_deref())?;
            options.check_fetch_containment |= check_fetch_containment;
            if prefer_bag_info {
                options.metadata_precedence = MetadataPrecedence::BagInfo;
            }
            read(&root, options, json)?;
        }
    }
    Ok(())
}

fn load_options(config: Option<&Path>) -> Result<ReadOptions> {
    let Some(path) = config else {
        return Ok(ReadOptions::default());
    };
    let f = File::open(path).with_context(|| format!("open config {}", path.display()))?;
    let options: ReadOptions =
        serde_json::from_reader(f).with_context(|| format!("parse config {}", path.display()))?;
    debug!("loaded options {:?} from {}", options, path.display());
    Ok(options)
}

#[derive(Serialize)]
struct ManifestSummary {
    algorithm: String,
    entries: usize,
}

impl From<&Manifest> for ManifestSummary {
    fn from(m: &Manifest) -> Self {
        Self { algorithm: m.algorithm().bagit_name().to_string(), entries: m.len() }
    }
}

#[derive(Serialize)]
struct FetchSummary {
    url: String,
    length: Option<u64>,
    path: String,
}

#[derive(Serialize)]
struct BagSummary {
    root: String,
    version: String,
    tag_file_encoding: String,
    payload_manifests: Vec<ManifestSummary>,
    tag_manifests: Vec<ManifestSummary>,
    metadata: Vec<(String, String)>,
    items_to_fetch: Vec<FetchSummary>,
}

impl From<&Bag> for BagSummary {
    fn from(bag: &Bag) -> Self {
        Self {
            root: bag.root().display().to_string(),
            version: bag.version().to_string(),
            tag_file_encoding: bag.tag_file_encoding().to_string(),
            payload_manifests: bag.payload_manifests().iter().map(Into::into).collect(),
            tag_manifests: bag.tag_manifests().iter().map(Into::into).collect(),
            metadata: bag.metadata().to_vec(),
            items_to_fetch: bag
                .items_to_fetch()
                .iter()
                .map(|i| FetchSummary {
                    url: i.url.to_string(),
                    length: i.length,
                    path: i.path.display().to_string(),
                })
                .collect(),
        }
    }
}

fn read(root: &Path, options: ReadOptions, json: bool) -> Result<()> {
    let bag = BagReader::new()
        .with_options(options)
        .read(root)
        .with_context(|| format!("read bag at {}", root.display()))?;
    let summary = BagSummary::from(&bag);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Bag: {}", summary.root);
    println!("BagIt-Version: {}", summary.version);
    println!("Tag-File-Character-Encoding: {}", summary.tag_file_encoding);
    for m in &summary.payload_manifests {
        println!("Payload manifest {}: {} entries", m.algorithm, m.entries);
    }
    for m in &summary.tag_manifests {
        println!("Tag manifest {}: {} entries", m.algorithm, m.entries);
    }
    println!("Metadata: {} entries", summary.metadata.len());
    println!("Fetch items: {}", summary.items_to_fetch.len());
    println!("OK");
    Ok(())
}
