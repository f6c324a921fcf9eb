// ABOUTME: Writes finished simulation runs to disk as JSON, CSV or Markdown
// Acts as a plotter so it can sit next to the terminal chart

use super::driver::RatioPlotter;
use super::simulator::SimulationRun;
use crate::app::config::ExportFormat;
use crate::utils::error::Result;
use crate::utils::format::{format_ratio, format_usd};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    generated_at: DateTime<Local>,
    iterations: usize,
    runs: &'a [SimulationRun],
}

/// Render `runs` in the requested format
pub fn render_runs(runs: &[SimulationRun], format: &ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => {
            let document = ExportDocument {
                generated_at: Local::now(),
                iterations: runs.first().map(|r| r.ratios.len()).unwrap_or(0),
                runs,
            };
            Ok(serde_json::to_string_pretty(&document)?)
        }
        ExportFormat::Csv => {
            let mut out = String::from("label,iteration,ratio\n");
            for run in runs {
                for (i, ratio) in run.ratios.iter().enumerate() {
                    let _ = writeln!(out, "{},{},{}", run.label(), i, ratio);
                }
            }
            Ok(out)
        }
        ExportFormat::Markdown => {
            let mut out = String::from(
                "| Threshold | Tracker cost | Baseline cost | Cost ratio | Refreshes |\n\
                 |-----------|--------------|---------------|------------|-----------|\n",
            );
            for run in runs {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    run.label(),
                    format_usd(run.tracker_cost),
                    format_usd(run.baseline_cost),
                    format_ratio(run.final_ratio()),
                    run.refreshes
                );
            }
            Ok(out)
        }
    }
}

/// Plotter that writes the runs to a file
pub struct FileExporter {
    path: PathBuf,
    format: ExportFormat,
}

impl FileExporter {
    pub fn new(path: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

impl RatioPlotter for FileExporter {
    fn plot(&mut self, runs: &[SimulationRun]) -> Result<()> {
        let contents = render_runs(runs, &self.format)?;
        std::fs::write(&self.path, contents)?;
        info!(path = %self.path.display(), format = ?self.format, "exported simulation runs");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_runs() -> Vec<SimulationRun> {
        vec![
            SimulationRun {
                threshold: 0.72,
                ratios: vec![1.0, 1.25],
                tracker_cost: 0.0024,
                baseline_cost: 0.003,
                refreshes: 2,
            },
            SimulationRun {
                threshold: 2.0,
                ratios: vec![1.0, 0.8],
                tracker_cost: 0.005,
                baseline_cost: 0.004,
                refreshes: 2,
            },
        ]
    }

    #[test]
    fn test_csv_export() {
        let csv = render_runs(&sample_runs(), &ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "label,iteration,ratio");
        assert_eq!(lines[1], "π=0.72,0,1");
        assert_eq!(lines[2], "π=0.72,1,1.25");
        assert_eq!(lines[4], "π=2,1,0.8");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_markdown_export() {
        let md = render_runs(&sample_runs(), &ExportFormat::Markdown).unwrap();
        assert!(md.contains("| π=0.72 | $0.002 | $0.003 | 1.250 | 2 |"));
        assert!(md.contains("| π=2 | $0.005 | $0.004 | 0.800 | 2 |"));
    }

    #[test]
    fn test_json_export() {
        let json = render_runs(&sample_runs(), &ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["iterations"], 2);
        assert_eq!(value["runs"].as_array().unwrap().len(), 2);
        assert_eq!(value["runs"][1]["threshold"], 2.0);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_file_exporter_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");

        let mut exporter = FileExporter::new(&path, ExportFormat::Csv);
        exporter.plot(&sample_runs()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("label,iteration,ratio"));
    }
}
