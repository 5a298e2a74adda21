//! Banner, final summary and the JSON results report.

use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use crate::PublishResult;
use crate::pipeline::Report;
use crate::utils::Colors;
use crate::utils::config::ProgressConsts;

/// Key/value table without outer borders.
fn stats_table(items: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (key, value) in items {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

/// What is about to run.
pub fn print_banner(dirs: usize, workers: usize, use_lfs: bool, dry_run: bool, owner: &str) {
    let items = [
        ("Directories", dirs.to_string()),
        ("Workers", workers.to_string()),
        ("Git LFS", use_lfs.to_string()),
        ("Dry run", dry_run.to_string()),
        ("Owner", owner.to_string()),
    ];
    println!();
    println!(
        "{}",
        Colors::colorize(Colors::ACCENT, &format!("Publishing {} directories", dirs))
    );
    println!("{}", stats_table(&items));
    println!();
}

/// `  ✗ name: message` for the first [`ProgressConsts::FAILURE_LIST_CAP`] failures, then an
/// `... and N more` line pointing at `--report`.
pub fn failure_lines(report: &Report) -> Vec<String> {
    let failures: Vec<&PublishResult> = report.failures().collect();
    let mut lines: Vec<String> = failures
        .iter()
        .take(ProgressConsts::FAILURE_LIST_CAP)
        .map(|r| format!("  ✗ {}: {}", r.dir_name(), r.message))
        .collect();
    if failures.len() > ProgressConsts::FAILURE_LIST_CAP {
        lines.push(format!(
            "  ... and {} more (use --report FILE for the full list)",
            failures.len() - ProgressConsts::FAILURE_LIST_CAP
        ));
    }
    lines
}

/// Estimated speedup over publishing one directory at a time, and that sequential time in
/// seconds. None for dry runs, small runs, or a zero elapsed time.
pub fn sequential_speedup(total: usize, elapsed: Duration, dry_run: bool) -> Option<(f64, u64)> {
    if dry_run || total <= ProgressConsts::SPEEDUP_MIN_DIRS || elapsed.is_zero() {
        return None;
    }
    let sequential = total as f64 * ProgressConsts::SEQUENTIAL_SECS_PER_DIR;
    Some((sequential / elapsed.as_secs_f64(), sequential as u64))
}

/// Totals, timing, speedup, the (capped) failure list and the LFS note.
pub fn print_summary(report: &Report, dry_run: bool) {
    let stats = &report.stats;
    let mut items = vec![
        ("Total directories", stats.total().to_string()),
        ("Successful", stats.success().to_string()),
        ("Failed", stats.failed().to_string()),
        ("LFS files", stats.lfs_files().to_string()),
        ("Time elapsed", format!("{:.1}s", stats.elapsed().as_secs_f64())),
    ];
    if stats.total() > 0 && !stats.elapsed().is_zero() {
        items.push(("Average speed", format!("{:.2} dirs/sec", stats.throughput())));
    }
    println!();
    println!("{}", stats_table(&items));

    if let Some((speedup, seq_secs)) = sequential_speedup(stats.total(), stats.elapsed(), dry_run)
    {
        println!();
        println!("⚡ Performance: {:.1}x faster than sequential", speedup);
        println!("   Sequential would take: ~{}s ({}m)", seq_secs, seq_secs / 60);
    }

    let lines = failure_lines(report);
    if lines.is_empty() {
        if stats.total() > 0 {
            println!();
            println!(
                "{}",
                Colors::colorize(
                    Colors::SUCCESS,
                    &format!("All {} directories succeeded", stats.total())
                )
            );
        }
    } else {
        println!();
        println!(
            "{}",
            Colors::colorize(
                Colors::FAILURE,
                &format!("Failed directories ({}):", stats.failed())
            )
        );
        for line in lines {
            println!("{}", line);
        }
    }

    if stats.lfs_files() > 0 {
        println!();
        println!(
            "{}",
            Colors::colorize(
                Colors::NOTE,
                &format!(
                    "Note: {} large files were handled with Git LFS",
                    stats.lfs_files()
                )
            )
        );
    }
}

/// Write every result as pretty JSON.
pub fn write_report(path: &Path, results: &[PublishResult]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create report {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), results)
        .with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
