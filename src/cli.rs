use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "wellrecords",
    version,
    about = "Normalize extracted well-completion report text into well and stimulation records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Ingest(IngestArgs),
    Inspect(InspectArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long, default_value = "extracted_data")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = "oil_wells.db")]
    pub db_path: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[command(flatten)]
    pub cleaning: CleaningArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    pub document_path: PathBuf,

    #[command(flatten)]
    pub cleaning: CleaningArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "oil_wells.db")]
    pub db_path: PathBuf,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct CleaningArgs {
    /// Skip the stray-lowercase repair applied to the start of operator names.
    #[arg(long, default_value_t = false)]
    pub no_operator_case_repair: bool,
}
