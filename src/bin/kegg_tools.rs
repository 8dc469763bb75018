use std::collections::BTreeSet;
use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kegg_tools::analysis::{CsvTarget, Enrichment};
use kegg_tools::catalog::immune_system_pathway_ids;
use kegg_tools::config::{ConfigLoader, Settings};
use kegg_tools::error::KeggError;
use kegg_tools::output::JsonOutput;
use kegg_tools::resolver::{KeggHttpClient, MAX_GENES_PER_REQUEST, Resolver, get_gene_names};
use kegg_tools::storage::Storage;

#[derive(Parser)]
#[command(name = "kegg-tools")]
#[command(about = "KEGG pathway retrieval and enrichment analysis")]
#[command(version, author)]
struct Cli {
    /// Config file (defaults to ./kegg-tools.json when present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    cache_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print a summary of one pathway")]
    Pathway(PathwayArgs),
    #[command(about = "List pathways of an organism")]
    Pathways(OrganismArgs),
    #[command(about = "List KEGG organisms")]
    Organisms,
    #[command(about = "List KEGG compounds")]
    Compounds,
    #[command(about = "Resolve gene identifiers to gene names")]
    Genes(GenesArgs),
    #[command(about = "Run a pathway enrichment analysis")]
    Enrich(EnrichArgs),
}

#[derive(Args)]
struct PathwayArgs {
    organism: String,
    number: String,
}

#[derive(Args)]
struct OrganismArgs {
    /// Falls back to the organism of the config file
    organism: Option<String>,
}

#[derive(Args)]
struct GenesArgs {
    /// Identifiers like mmu:12043
    #[arg(required = true)]
    genes: Vec<String>,
}

#[derive(Args)]
struct EnrichArgs {
    organism: Option<String>,

    /// File with one gene id per line
    #[arg(long)]
    genes: Utf8PathBuf,

    /// Pathway numbers to test; all pathways of the organism when omitted
    #[arg(long = "pathway")]
    pathways: Vec<String>,

    /// Restrict the output to immune system pathways
    #[arg(long)]
    immune: bool,

    #[arg(long)]
    csv: Option<Utf8PathBuf>,

    #[arg(long, default_value_t = '\t')]
    delimiter: char,

    #[arg(long)]
    overwrite: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kegg) = report.downcast_ref::<KeggError>() {
            return ExitCode::from(map_exit_code(kegg));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KeggError) -> u8 {
    match error {
        KeggError::CacheMiss(_) | KeggError::CacheDirMissing(_) | KeggError::ConfigRead(_) => 2,
        KeggError::KeggHttp(_) | KeggError::KeggStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(cache_dir) = cli.cache_dir {
        settings.cache_dir = cache_dir;
    }

    let client = KeggHttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;
    let storage = Storage::new(settings.cache_dir.clone())?;
    let resolver = Resolver::new(storage, client).with_base_url(settings.base_url.as_str());

    match cli.command {
        Commands::Pathway(args) => {
            let pathway = resolver.get_pathway(&args.organism, &args.number)?;
            JsonOutput::print_pathway(&pathway.summary()).into_diagnostic()
        }
        Commands::Pathways(args) => {
            let organism = organism_or_default(args.organism, &settings)?;
            let list = resolver.get_pathway_list(&organism)?;
            JsonOutput::print_list(&list).into_diagnostic()
        }
        Commands::Organisms => {
            JsonOutput::print_list(&resolver.get_organism_list()?).into_diagnostic()
        }
        Commands::Compounds => JsonOutput::print_list(&resolver.get_compounds()?).into_diagnostic(),
        Commands::Genes(args) => {
            let names = get_gene_names(
                resolver.client(),
                resolver.base_url(),
                &args.genes,
                MAX_GENES_PER_REQUEST,
            )?;
            JsonOutput::print_list(&names).into_diagnostic()
        }
        Commands::Enrich(args) => run_enrich(args, &resolver, &settings),
    }
}

fn run_enrich(
    args: EnrichArgs,
    resolver: &Resolver<KeggHttpClient>,
    settings: &Settings,
) -> miette::Result<()> {
    let organism = organism_or_default(args.organism, settings)?;
    let content = fs::read_to_string(args.genes.as_std_path())
        .map_err(|err| KeggError::Filesystem(format!("read {}: {err}", args.genes)))?;
    let genes: Vec<&str> = content.split_whitespace().collect();

    let numbers: Vec<String> = if args.pathways.is_empty() {
        resolver
            .get_pathway_list(&organism)?
            .keys()
            .filter_map(|key| pathway_number(key))
            .collect()
    } else {
        args.pathways
    };
    let unique: BTreeSet<&str> = numbers.iter().map(String::as_str).collect();
    tracing::info!(organism = %organism, pathways = unique.len(), genes = genes.len(), "running enrichment");

    let pathways = unique
        .into_iter()
        .map(|number| resolver.get_pathway(&organism, number))
        .collect::<Result<Vec<_>, KeggError>>()?;

    let mut enrichment = Enrichment::new(pathways);
    enrichment.run_analysis(&genes)?;
    if args.immune {
        let kept = enrichment.retain_pathways(&immune_system_pathway_ids())?;
        tracing::info!(kept, "kept immune system pathways");
    }

    match args.csv {
        Some(path) => {
            if !args.delimiter.is_ascii() {
                return Err(KeggError::InvalidField {
                    field: "csv delimiter",
                    value: args.delimiter.to_string(),
                }
                .into());
            }
            let target = CsvTarget::Path {
                path: &path,
                overwrite: args.overwrite,
            };
            enrichment.to_csv(target, args.delimiter as u8)?;
            Ok(())
        }
        None => JsonOutput::print_enrichment(&enrichment.to_json()?).into_diagnostic(),
    }
}

fn organism_or_default(organism: Option<String>, settings: &Settings) -> Result<String, KeggError> {
    organism
        .or_else(|| settings.organism.clone())
        .ok_or_else(|| KeggError::InvalidField {
            field: "pathway organism",
            value: String::new(),
        })
}

/// Trailing five digits of a pathway list key such as `path:mmu04064`.
fn pathway_number(key: &str) -> Option<String> {
    let start = key.len().checked_sub(5)?;
    let number = key.get(start..)?;
    number
        .bytes()
        .all(|byte| byte.is_ascii_digit())
        .then(|| number.to_string())
}
