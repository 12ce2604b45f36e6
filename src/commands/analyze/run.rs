use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::info;

use super::fetch::{FetchConfig, HttpFetcher};
use super::load::{BrandedTerms, load_rows};
use super::pipeline::{AnalysisOutcome, analyze_groups};
use super::prompt::{INPUT_PROMPT, TERMS_PROMPT, prompt_line};
use super::select::{UrlGroup, group_by_url, select_top_queries};
use crate::cli::AnalyzeArgs;
use crate::model::AnalysisManifest;
use crate::results::write_results;
use crate::util::{now_utc_string, round_two, sha256_file, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let input_path = resolve_input_path(args.input.clone())?;
    let branded_terms = match args.branded_terms.as_deref() {
        Some(raw) => BrandedTerms::parse(raw),
        None => BrandedTerms::parse(&ask(TERMS_PROMPT)?),
    };
    let fetch_config = FetchConfig::new(
        args.request_delay_secs,
        args.timeout_secs,
        &args.user_agent,
        !args.no_proxy,
    )?;

    info!(
        input = %input_path.display(),
        output = %args.output.display(),
        terms = branded_terms.terms().len(),
        "starting analysis"
    );

    let rows = load_rows(&input_path)?;
    let rows_loaded = rows.len();
    let rows = branded_terms.filter(rows);
    let rows_after_filter = rows.len();
    let groups = group_by_url(rows);

    if args.dry_run {
        log_selections(&groups);
        info!(urls = groups.len(), "analysis dry-run complete");
        return Ok(());
    }

    let fetcher = HttpFetcher::new(&fetch_config)?;
    let outcome = analyze_groups(&groups, &fetcher);

    write_results(&args.output, &outcome.records)?;
    info!(
        path = %args.output.display(),
        records = outcome.records.len(),
        urls_analyzed = outcome.analyzed_urls,
        urls_skipped = outcome.skipped_urls.len(),
        avg_queries_per_url = average_queries_per_url(&outcome),
        "analysis complete, results saved"
    );

    if let Some(summary_path) = args.summary_path.as_deref() {
        let manifest = AnalysisManifest {
            manifest_version: MANIFEST_VERSION,
            generated_at: now_utc_string(),
            input_path: input_path.display().to_string(),
            input_sha256: sha256_file(&input_path)?,
            output_path: args.output.display().to_string(),
            branded_terms: branded_terms.terms().to_vec(),
            rows_loaded,
            rows_after_filter,
            urls_total: groups.len(),
            urls_analyzed: outcome.analyzed_urls,
            urls_skipped: outcome.skipped_urls.clone(),
            records_written: outcome.records.len(),
            avg_queries_per_url: average_queries_per_url(&outcome),
        };
        write_summary(summary_path, &manifest)?;
    }

    Ok(())
}

fn resolve_input_path(input: Option<PathBuf>) -> Result<PathBuf> {
    let path = match input {
        Some(path) => path,
        None => PathBuf::from(ask(INPUT_PROMPT)?.trim()),
    };

    if path.as_os_str().is_empty() {
        bail!("no input file given");
    }
    Ok(path)
}

fn ask(prompt: &str) -> Result<String> {
    prompt_line(prompt, &mut io::stdin().lock(), &mut io::stdout().lock())
}

fn log_selections(groups: &[UrlGroup]) {
    for group in groups {
        let selection = select_top_queries(&group.rows);
        let queries = selection
            .iter()
            .map(|row| row.query.as_str())
            .collect::<Vec<_>>();
        info!(
            url = %group.url,
            rows = group.rows.len(),
            selected = selection.len(),
            queries = ?queries,
            "selected queries"
        );
    }
}

fn average_queries_per_url(outcome: &AnalysisOutcome) -> f64 {
    if outcome.analyzed_urls == 0 {
        return 0.0;
    }
    round_two(outcome.records.len() as f64 / outcome.analyzed_urls as f64)
}

fn write_summary(path: &Path, manifest: &AnalysisManifest) -> Result<()> {
    write_json_pretty(path, manifest)?;
    info!(path = %path.display(), "wrote run manifest");
    Ok(())
}
