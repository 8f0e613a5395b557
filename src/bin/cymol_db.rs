use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cymol_db::config::{ClientConfig, ConfigLoader};
use cymol_db::domain::{StructureId, TriState};
use cymol_db::error::{CymolError, ErrorKind};
use cymol_db::ncbi::{EutilsService, FetchRequest};
use cymol_db::output::JsonOutput;
use cymol_db::query::SearchSpec;
use cymol_db::rcsb::RcsbService;
use cymol_db::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "cymol-db")]
#[command(about = "Query RCSB and NCBI E-utilities the way the molecular viewer does")]
#[command(version)]
struct Cli {
    /// JSON client configuration (endpoints, timeout, user agent)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Download and parse a PDB entry")]
    Entry { id: String },
    #[command(about = "Fetch title, date and authors of a PDB entry")]
    Header { id: String },
    #[command(about = "Run an RCSB composite search")]
    Search(SearchArgs),
    #[command(about = "Fetch sequence records through E-utilities efetch")]
    Efetch(EfetchArgs),
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    min_resolution: Option<f64>,
    #[arg(long)]
    max_resolution: Option<f64>,
    #[arg(long)]
    min_date: Option<String>,
    #[arg(long)]
    max_date: Option<String>,
    #[arg(long = "keyword")]
    keywords: Vec<String>,
    #[arg(long = "author")]
    authors: Vec<String>,
    #[arg(long = "structure-id", value_delimiter = ',')]
    structure_ids: Vec<String>,
    #[arg(long = "title-contains")]
    title_contains: Vec<String>,
    #[arg(long)]
    method: Option<String>,
    #[arg(long, value_enum, default_value_t = TriState::Unspecified)]
    rna: TriState,
    #[arg(long, value_enum, default_value_t = TriState::Unspecified)]
    protein: TriState,
    #[arg(long, value_enum, default_value_t = TriState::Unspecified)]
    dna: TriState,
    #[arg(long, value_enum, default_value_t = TriState::Unspecified)]
    hybrid: TriState,
}

impl From<SearchArgs> for SearchSpec {
    fn from(args: SearchArgs) -> Self {
        SearchSpec {
            min_resolution: args.min_resolution,
            max_resolution: args.max_resolution,
            min_date: args.min_date,
            max_date: args.max_date,
            keywords: args.keywords,
            authors: args.authors,
            structure_ids: args.structure_ids,
            title_contains: args.title_contains,
            experimental_method: args.method,
            contains_rna: args.rna,
            contains_protein: args.protein,
            contains_dna: args.dna,
            contains_hybrid: args.hybrid,
        }
    }
}

#[derive(Args)]
struct EfetchArgs {
    #[arg(long)]
    db: Option<String>,
    #[arg(long = "id", value_delimiter = ',')]
    ids: Vec<String>,
    #[arg(long)]
    rettype: Option<String>,
    #[arg(long)]
    retmode: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<CymolError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CymolError) -> u8 {
    match error.kind() {
        ErrorKind::Validation | ErrorKind::Unsupported => 2,
        ErrorKind::Transport | ErrorKind::ServiceUnavailable => 3,
        ErrorKind::Parse => 4,
        ErrorKind::Config => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;
    runtime.block_on(execute(cli.command, config))
}

async fn execute(command: Command, config: ClientConfig) -> miette::Result<()> {
    let transport = HttpTransport::new(&config)?;
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    match command {
        Command::Entry { id } => {
            let id: StructureId = id.parse()?;
            let rcsb = RcsbService::new(transport, config.rcsb);
            let structures = rcsb.fetch_entry(&id, &cancel).await?;
            JsonOutput::print_structures(&structures).into_diagnostic()
        }
        Command::Header { id } => {
            let id: StructureId = id.parse()?;
            let rcsb = RcsbService::new(transport, config.rcsb);
            let header = rcsb.fetch_header(&id, &cancel).await?;
            JsonOutput::print_header(&header).into_diagnostic()
        }
        Command::Search(args) => {
            let rcsb = RcsbService::new(transport, config.rcsb);
            let result = rcsb.search(args.into(), &cancel).await?;
            JsonOutput::print_search(&result).into_diagnostic()
        }
        Command::Efetch(args) => {
            let eutils = EutilsService::new(transport, config.eutils);
            let request = FetchRequest {
                database: args.db,
                ids: (!args.ids.is_empty()).then_some(args.ids),
                return_type: args.rettype,
                return_mode: args.retmode,
            };
            let payload = eutils.fetch(request, &cancel).await?;
            JsonOutput::print_sequences(&payload).into_diagnostic()
        }
    }
}
