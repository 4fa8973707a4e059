use anyhow::{Context, Result};
use areasurf_base::ConversionSettings;
use areasurf_convert::automate;
use areasurf_io::json::read_json;
use areasurf_io::{FileHost, HostContext, load_settings, write_schema};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "areasurf")]
#[command(about = "Converts area boundary curves to planar mesh surfaces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the conversion for one triggering version.
    Run(RunArgs),
    /// Write the function input schema for host registration.
    GenerateSchema(SchemaArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Host context JSON file.
    #[arg(long)]
    context: PathBuf,
    /// Function inputs, inline JSON or a JSON file. Defaults apply when omitted.
    #[arg(long)]
    inputs: Option<String>,
    #[arg(long)]
    token: Option<String>,
}

#[derive(Args)]
struct SchemaArgs {
    out: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::GenerateSchema(args) => generate_schema(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let context: HostContext = read_json(&args.context).context("failed to read host context")?;
    let settings = match args.inputs.as_deref() {
        Some(source) => load_settings(source)?,
        None => ConversionSettings::default(),
    };
    info!(
        project = %context.project_id,
        version = %context.version_id,
        tolerance = settings.surface_tolerance,
        min_area = settings.min_area_threshold,
        merge_holes = settings.merge_holes,
        preserve_original = settings.preserve_original,
        "starting area boundary conversion"
    );

    let mut host = FileHost::new(context, args.token);
    let summary = automate(&mut host, &settings)?;
    info!(
        status = ?summary.status,
        summary = %host.context().summary_path().display(),
        "run complete"
    );
    Ok(())
}

fn generate_schema(args: SchemaArgs) -> Result<()> {
    write_schema(&args.out).context("schema export failed")?;
    info!(path = %args.out.display(), "schema export complete");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
