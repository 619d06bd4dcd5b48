//! Import run orchestration
//!
//! Coordinates one run across the configured sources: fetch, normalize,
//! deduplicate, write, and record one import log row per source. Per-record
//! and per-source failures are absorbed into counters and error lists; only
//! run-level preconditions surface to the caller. The cancellation token is
//! observed between records, so a stop request halts the run at the next
//! check point with the counts so far intact.

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::db::{import_logs, tools};
use crate::models::{RunState, RunStatus, SourceCounters};
use crate::services::duplicate_detector::{self, Match};
use crate::services::normalizer::{self, Outcome};
use crate::sources::Source;

/// Import coordinator service
pub struct ImportCoordinator {
    db: SqlitePool,
    sources: Vec<Arc<dyn Source>>,
}

impl ImportCoordinator {
    pub fn new(db: SqlitePool, sources: Vec<Arc<dyn Source>>) -> Self {
        Self { db, sources }
    }

    /// Names of all configured sources
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Whether a source with this name is configured
    pub fn has_source(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s.name() == name)
    }

    /// Execute one import run
    ///
    /// `source_filter` selects a single named source; `None` runs all
    /// configured sources. Counters are mirrored into `status` as the run
    /// progresses so `GET /import/status` reflects live progress. Records
    /// are processed sequentially: duplicate detection plus write for
    /// candidates that could resolve to the same slug or domain must not
    /// race.
    pub async fn run(
        &self,
        source_filter: Option<&str>,
        cancel_token: CancellationToken,
        status: Arc<RwLock<Option<RunStatus>>>,
    ) -> Result<Vec<SourceCounters>> {
        let selected: Vec<&Arc<dyn Source>> = self
            .sources
            .iter()
            .filter(|s| source_filter.map_or(true, |f| s.name() == f))
            .collect();

        let mut reports = Vec::with_capacity(selected.len());

        for source in selected {
            if cancel_token.is_cancelled() {
                break;
            }

            let counters = self.run_source(source.as_ref(), &cancel_token).await;

            tracing::info!(
                source = %counters.source,
                fetched = counters.fetched,
                imported = counters.imported,
                skipped = counters.skipped,
                errors = counters.errors.len(),
                "Source import finished"
            );

            // One log row per source processed, stopped or not
            if let Err(e) = import_logs::insert_log(&self.db, &counters).await {
                tracing::error!(source = %counters.source, error = %e, "Failed to write import log");
            }

            {
                let mut guard = status.write().await;
                if let Some(run) = guard.as_mut() {
                    run.counters.push(counters.clone());
                }
            }

            reports.push(counters);
        }

        {
            let mut guard = status.write().await;
            if let Some(run) = guard.as_mut() {
                if cancel_token.is_cancelled() {
                    run.transition_to(RunState::Stopped);
                } else {
                    run.transition_to(RunState::Completed);
                }
            }
        }

        Ok(reports)
    }

    /// Process one source: fetch, then normalize/detect/write each candidate
    async fn run_source(&self, source: &dyn Source, cancel_token: &CancellationToken) -> SourceCounters {
        let mut counters = SourceCounters::new(source.name());

        let candidates = match source.fetch().await {
            Ok(candidates) => candidates,
            Err(e) => {
                // Scoped to this source; the run continues with the rest
                tracing::warn!(source = %source.name(), error = %e, "Source fetch failed");
                counters.errors.push(e.to_string());
                return counters;
            }
        };

        counters.fetched = candidates.len();

        for candidate in &candidates {
            // Cooperative stop: observed between records only
            if cancel_token.is_cancelled() {
                tracing::info!(
                    source = %source.name(),
                    processed = counters.imported + counters.skipped + counters.errors.len(),
                    "Stop requested, halting source mid-run"
                );
                break;
            }

            let tool = match normalizer::normalize(candidate, source.name()) {
                Outcome::Tool(tool) => tool,
                Outcome::Skip(reason) => {
                    tracing::debug!(source = %source.name(), reason = ?reason, "Candidate skipped");
                    counters.skipped += 1;
                    continue;
                }
            };

            match duplicate_detector::detect(&self.db, &tool).await {
                Ok(Match::New) => match tools::insert_tool(&self.db, &tool).await {
                    Ok(id) => {
                        tracing::info!(source = %source.name(), slug = %tool.slug, tool_id = %id, "Imported new tool");
                        counters.imported += 1;
                    }
                    Err(e) => {
                        // Constraint violation despite detection (race or miss)
                        tracing::warn!(source = %source.name(), slug = %tool.slug, error = %e, "Tool insert failed");
                        counters.errors.push(format!("{}: {}", tool.slug, e));
                    }
                },
                Ok(Match::Existing(id)) => {
                    // Merge fills gaps only; curation stays authoritative
                    if let Err(e) = tools::merge_tool(&self.db, id, &tool).await {
                        tracing::warn!(source = %source.name(), slug = %tool.slug, error = %e, "Tool merge failed");
                        counters.errors.push(format!("{}: {}", tool.slug, e));
                    } else {
                        tracing::debug!(source = %source.name(), slug = %tool.slug, tool_id = %id, "Merged into existing tool");
                    }
                }
                Err(e) => {
                    tracing::warn!(source = %source.name(), slug = %tool.slug, error = %e, "Duplicate detection failed");
                    counters.errors.push(format!("{}: {}", tool.slug, e));
                }
            }
        }

        counters
    }
}
