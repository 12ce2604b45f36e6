use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Parser, Debug)]
#[command(
    name = "seo-presence",
    version,
    about = "Check whether top search queries appear in their landing pages"
)]
pub struct Cli {
    #[arg(long, global = true, default_value = "seo_analysis.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Analyze(AnalyzeArgs),
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub branded_terms: Option<String>,

    #[arg(long, default_value = "seo_analysis_results.csv")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 1.0)]
    pub request_delay_secs: f64,

    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long)]
    pub summary_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_proxy: bool,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long, default_value = "seo_analysis_results.csv")]
    pub results_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
