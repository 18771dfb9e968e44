//! Report generation
//!
//! Renders the final status snapshot and replay statistics as plain text or
//! JSON.

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use car_status_decoder::{CarStatus, FieldSnapshot, ReplayStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

/// Everything one run produces
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub tool_version: &'static str,
    pub captures: Vec<PathBuf>,
    pub fields: Vec<FieldSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ReplayStats>,
}

impl Report {
    /// Build a report from the final status, keeping only `track` fields if
    /// the list is non-empty
    pub fn new(
        captures: Vec<PathBuf>,
        status: &CarStatus,
        track: &[String],
        stats: Option<ReplayStats>,
    ) -> Self {
        let fields = status
            .fields()
            .into_iter()
            .filter(|f| track.is_empty() || track.iter().any(|t| t == f.name))
            .collect();

        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION"),
            captures,
            fields,
            stats,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Txt => Ok(self.render_txt()),
            OutputFormat::Json => self.render_json(),
        }
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    pub fn render_txt(&self) -> String {
        let mut out = String::new();
        let rule = "─".repeat(47);

        let _ = writeln!(out, "Car Status Report");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for capture in &self.captures {
            let _ = writeln!(out, "Capture:   {}", capture.display());
        }

        let _ = writeln!(out, "\nFields:");
        let width = self.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
        for field in &self.fields {
            match field.last_update {
                Some(tick) => {
                    let _ = writeln!(
                        out,
                        "  {:<width$}  {:>10}  @ {} ms",
                        field.name,
                        field.value.to_string(),
                        tick,
                        width = width
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "  {:<width$}  {:>10}",
                        field.name,
                        "-",
                        width = width
                    );
                }
            }
        }

        if let Some(stats) = &self.stats {
            let _ = writeln!(out, "\nStatistics:");
            let _ = writeln!(out, "  Total frames:  {}", stats.total_frames);
            let _ = writeln!(out, "  Decoded:       {}", stats.decoded);
            let _ = writeln!(out, "  Too short:     {}", stats.skipped_short);
            let _ = writeln!(out, "  Filtered:      {}", stats.filtered);
            let _ = writeln!(out, "  Unknown ID:    {}", stats.unknown);
            let _ = writeln!(out, "  Read errors:   {}", stats.read_errors);
        }

        out
    }
}

/// Per-identifier frame counts, sorted by identifier
pub fn render_id_counts(stats: &ReplayStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Frames Loaded: {}", stats.total_frames);
    let _ = writeln!(out, "{}", "-".repeat(30));
    for (id, count) in &stats.per_id {
        let _ = writeln!(out, "ID: 0x{:03X}, count: {}", id, count);
    }
    out
}
