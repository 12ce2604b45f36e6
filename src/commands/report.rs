use std::collections::HashSet;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ReportArgs;
use crate::model::{PresenceRecord, ResultsReport, Slot, SlotCoverage};
use crate::results::read_results;
use crate::util::round_two;

pub fn run(args: ReportArgs) -> Result<()> {
    let records = read_results(&args.results_path)?;
    let report = build_report(&args.results_path.display().to_string(), &records);

    info!(
        path = %args.results_path.display(),
        urls = report.urls_analyzed,
        queries = report.queries_analyzed,
        "summarized results"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        write_json_report(&mut output, &report)?;
    } else {
        write_text_report(&mut output, &report)?;
    }
    output.flush()?;
    Ok(())
}

pub fn build_report(results_path: &str, records: &[PresenceRecord]) -> ResultsReport {
    let urls_analyzed = records
        .iter()
        .map(|record| record.url.as_str())
        .collect::<HashSet<_>>()
        .len();
    let queries_analyzed = records.len();

    let avg_queries_per_url = if urls_analyzed == 0 {
        0.0
    } else {
        round_two(queries_analyzed as f64 / urls_analyzed as f64)
    };

    let slots = Slot::ALL
        .iter()
        .map(|slot| {
            let present = records
                .iter()
                .filter(|record| record.presence.get(*slot))
                .count();
            SlotCoverage {
                slot: slot.label(),
                present,
                percent: percent(present, queries_analyzed),
            }
        })
        .collect();

    ResultsReport {
        results_path: results_path.to_string(),
        urls_analyzed,
        queries_analyzed,
        avg_queries_per_url,
        queries_missing_everywhere: records
            .iter()
            .filter(|record| !record.presence.any())
            .count(),
        slots,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_two(count as f64 * 100.0 / total as f64)
}

fn write_json_report<W: Write>(output: &mut W, report: &ResultsReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *output, report)
        .context("failed to serialize report json output")?;
    writeln!(output)?;
    Ok(())
}

fn write_text_report<W: Write>(output: &mut W, report: &ResultsReport) -> Result<()> {
    writeln!(output, "Results: {}", report.results_path)?;
    writeln!(output, "Total URLs analyzed: {}", report.urls_analyzed)?;
    writeln!(output, "Total queries analyzed: {}", report.queries_analyzed)?;
    writeln!(output, "Avg queries per URL: {:.2}", report.avg_queries_per_url)?;
    writeln!(
        output,
        "Queries absent from every slot: {}",
        report.queries_missing_everywhere
    )?;
    writeln!(output)?;

    for coverage in &report.slots {
        writeln!(
            output,
            "{:<6} {:>6} {:>7.2}%",
            coverage.slot, coverage.present, coverage.percent
        )?;
    }

    Ok(())
}
