use crate::infra::{csv_match_service, load_match_config};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use talent_match::engine::{CohortSource, MatchReport, Position, RankedMatch};
use talent_match::error::AppError;
use talent_match::service::{HighPerformerView, MatchQuery};

#[derive(Args, Debug, Default)]
pub(crate) struct SnapshotArgs {
    /// Directory holding the CSV snapshot (defaults to MATCH_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MatchArgs {
    #[command(flatten)]
    pub(crate) snapshot: SnapshotArgs,
    /// Benchmark employee ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) manual: Vec<String>,
    /// Position whose qualifying holders join the benchmark
    #[arg(long)]
    pub(crate) position: Option<i64>,
    /// Minimum latest rating for role and fallback benchmarks
    #[arg(long)]
    pub(crate) min_rating: Option<i32>,
    /// Maximum number of ranked rows
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Write the ranking to this CSV file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print the per-group match rates under each row
    #[arg(long)]
    pub(crate) show_groups: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HighPerformerArgs {
    #[command(flatten)]
    pub(crate) snapshot: SnapshotArgs,
    /// Minimum rating in any review year
    #[arg(long)]
    pub(crate) min_rating: Option<i32>,
}

#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    employee_id: &'a str,
    fullname: &'a str,
    final_match_rate: f64,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        snapshot,
        manual,
        position,
        min_rating,
        limit,
        output,
        show_groups,
    } = args;

    let config = load_match_config(snapshot.data_dir)?;
    let service = csv_match_service(&config);
    let report = service.run(MatchQuery {
        manual_ids: manual,
        position_id: position,
        min_rating,
        limit,
    })?;

    print!("{}", render_match_report(&report, Utc::now(), show_groups));

    if let Some(path) = output {
        export_ranking(&path, &report.rows)?;
        println!("\nRanking written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_positions(args: SnapshotArgs) -> Result<(), AppError> {
    let config = load_match_config(args.data_dir)?;
    let positions = csv_match_service(&config).positions()?;
    print!("{}", render_positions(&positions));
    Ok(())
}

pub(crate) fn run_high_performers(args: HighPerformerArgs) -> Result<(), AppError> {
    let config = load_match_config(args.snapshot.data_dir)?;
    let candidates = csv_match_service(&config).high_performers(args.min_rating)?;
    print!("{}", render_high_performers(&candidates));
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn describe_cohort(source: &CohortSource, size: usize) -> String {
    match source {
        CohortSource::Explicit { manual, role } => format!(
            "explicit ({manual} manual, {role} role holders) | {size} benchmark employees"
        ),
        CohortSource::Fallback => format!("all top performers | {size} benchmark employees"),
    }
}

pub(crate) fn render_match_report(
    report: &MatchReport,
    generated_at: DateTime<Utc>,
    show_groups: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Talent match report");
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "Cohort: {}",
        describe_cohort(&report.cohort.source, report.cohort.size)
    );
    match report.competency_year {
        Some(year) => {
            let _ = writeln!(out, "Competency year: {year}");
        }
        None => {
            let _ = writeln!(out, "Competency year: none on file");
        }
    }
    let _ = writeln!(
        out,
        "Baselines: {} | group weight total {:.2}",
        report.baselines.len(),
        report.group_weight_total
    );
    let _ = writeln!(
        out,
        "Scored employees: {} | showing {}",
        report.scored_employees,
        report.rows.len()
    );

    let Some(top) = report.top() else {
        let _ = writeln!(out, "\nNo employees could be scored against this cohort.");
        return out;
    };

    let _ = writeln!(out, "\n{:>4}  {:<12} {:<28} {:>8}", "Rank", "Employee", "Name", "Match");
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<12} {:<28} {:>8.2}",
            row.rank,
            row.employee_id.as_str(),
            row.full_name,
            round2(row.final_score)
        );
        if show_groups {
            for group in &row.groups {
                let _ = writeln!(
                    out,
                    "        - {}: {:.2} (weight {:.2})",
                    group.group,
                    round2(group.match_rate),
                    group.weight
                );
            }
        }
    }

    let _ = writeln!(
        out,
        "\nTop match: {} {} ({:.2})",
        top.employee_id,
        top.full_name,
        round2(top.final_score)
    );
    out
}

pub(crate) fn render_positions(positions: &[Position]) -> String {
    let mut out = String::new();
    if positions.is_empty() {
        let _ = writeln!(out, "No positions on file.");
        return out;
    }
    for position in positions {
        let _ = writeln!(out, "{:>6}  {}", position.position_id.0, position.name);
    }
    out
}

pub(crate) fn render_high_performers(candidates: &[HighPerformerView]) -> String {
    let mut out = String::new();
    if candidates.is_empty() {
        let _ = writeln!(out, "No employees meet the rating threshold.");
        return out;
    }
    for candidate in candidates {
        let _ = writeln!(out, "- {}", candidate.label);
    }
    out
}

/// Write `employee_id,fullname,final_match_rate` rows with rates rounded to 2 decimals.
pub(crate) fn write_ranking<W: io::Write>(writer: W, rows: &[RankedMatch]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(RankingRow {
            employee_id: row.employee_id.as_str(),
            fullname: &row.full_name,
            final_match_rate: round2(row.final_score),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn export_ranking(path: &Path, rows: &[RankedMatch]) -> Result<(), AppError> {
    let file = std::fs::File::create(path)?;
    write_ranking(file, rows)?;
    Ok(())
}
