//! Branch report construction and rendering.
//!
//! A report takes the raw inputs handed over by the VCS collaborator
//! (branch names, commit epochs, per-branch properties), drops branches
//! beyond the age threshold, and orders the rest most recently committed
//! first.

use crate::commit_time::{CommitTime, SECONDS_PER_DAY};
use crate::error::{ReportError, Result};
use crate::properties::PropertyMap;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Display configuration for a report.
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    /// Drop branches whose last commit is more than this many days before
    /// "now". The exact boundary is kept.
    pub max_age_days: Option<u32>,

    /// Keep only branches whose name matches this pattern.
    pub name_only: Option<Regex>,

    /// Drop branches whose name matches this pattern.
    pub name_except: Option<Regex>,

    /// Property columns to render, in order. Usually the property union
    /// discovered from the configuration dump.
    pub columns: Vec<String>,
}

/// One row of the report: branch name, resolved commit time, custom
/// properties.
#[derive(Clone, Debug)]
pub struct BranchRecord {
    pub name: String,
    pub commit_time: CommitTime,
    pub properties: PropertyMap,
}

/// Machine-readable shape of one record.
#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    commit_epoch: i64,
    commit_time: String,
    relative: &'a str,
    properties: &'a PropertyMap,
}

/// An ordered, filtered branch listing ready for rendering.
#[derive(Clone, Debug)]
pub struct BranchReport {
    records: Vec<BranchRecord>,
    columns: Vec<String>,
}

impl BranchReport {
    /// Build a report from already-resolved inputs.
    ///
    /// `now` is read once here; every commit time in the report is
    /// labelled against it. Branches without a commit epoch were excluded
    /// upstream and are skipped. Empty branch names are rejected.
    pub fn build(
        branch_names: &[String],
        commit_epochs: &HashMap<String, i64>,
        properties: &BTreeMap<String, PropertyMap>,
        now: DateTime<Utc>,
        options: ReportOptions,
    ) -> Result<Self> {
        let mut records = Vec::with_capacity(branch_names.len());

        for name in branch_names {
            if name.is_empty() {
                return Err(ReportError::EmptyBranchName);
            }
            if let Some(ref only) = options.name_only {
                if !only.is_match(name) {
                    continue;
                }
            }
            if let Some(ref except) = options.name_except {
                if except.is_match(name) {
                    continue;
                }
            }
            let Some(&epoch) = commit_epochs.get(name) else {
                continue;
            };
            records.push(BranchRecord {
                name: name.clone(),
                commit_time: CommitTime::from_epoch(epoch, now)?,
                properties: properties.get(name).cloned().unwrap_or_default(),
            });
        }

        let candidates = records.len();
        if let Some(days) = options.max_age_days {
            let cutoff = now.timestamp() - i64::from(days) * SECONDS_PER_DAY;
            records.retain(|r| r.commit_time.epoch_seconds() >= cutoff);
        }

        // Stable sort: equal commit times keep the caller-supplied order.
        records.sort_by(|a, b| b.commit_time.cmp(&a.commit_time));

        debug!(
            candidates,
            kept = records.len(),
            max_age_days = ?options.max_age_days,
            "built branch report"
        );

        Ok(Self {
            records,
            columns: options.columns,
        })
    }

    /// Records in display order, most recently committed first.
    pub fn records(&self) -> &[BranchRecord] {
        &self.records
    }

    /// Configured property columns, in render order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cells for each row: branch name, canonical commit time, then one
    /// cell per configured column (empty when the branch lacks the
    /// property).
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                let mut cells = Vec::with_capacity(2 + self.columns.len());
                cells.push(record.name.clone());
                cells.push(record.commit_time.to_string());
                for column in &self.columns {
                    cells.push(record.properties.get(column).cloned().unwrap_or_default());
                }
                cells
            })
            .collect()
    }

    /// Render the report under an externally supplied header line. With no
    /// surviving branches the header is returned alone.
    pub fn render(&self, header: &str) -> String {
        let mut out = String::from(header);
        for row in self.rows() {
            out.push('\n');
            out.push_str(&row.join("\t"));
        }
        out
    }

    /// Machine-readable rows.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let rows: Vec<JsonRow<'_>> = self
            .records
            .iter()
            .map(|record| JsonRow {
                name: &record.name,
                commit_epoch: record.commit_time.epoch_seconds(),
                commit_time: record.commit_time.iso8601(),
                relative: record.commit_time.relative_label(),
                properties: &record.properties,
            })
            .collect();
        Ok(serde_json::to_value(rows)?)
    }
}
