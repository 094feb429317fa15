//! Batch pipeline: read → ingest → finalize → rank → report.
//!
//! A `Pipeline` owns all state for one run, so several runs can coexist in
//! one process without sharing anything.

use std::io::BufRead;

use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::finalize::finalize_league;
use crate::config::ReportConfig;
use crate::ingest::{IngestError, League};
use crate::leaderboard::{build_leaderboards, QualificationPool};
use crate::record::{RawRecord, RecordError, RecordReader};
use crate::report::Report;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("error at line {line}: {source}")]
    Ingest {
        line: usize,
        #[source]
        source: IngestError,
    },
}

impl PipelineError {
    /// 1-based line of the offending record.
    pub fn line(&self) -> usize {
        match self {
            PipelineError::Record(e) => e.line(),
            PipelineError::Ingest { line, .. } => *line,
        }
    }
}

/// One report run.
pub struct Pipeline {
    config: ReportConfig,
    league: League,
}

impl Pipeline {
    pub fn new(config: ReportConfig) -> Self {
        let league = League::new(config.rules());
        Self { config, league }
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    /// Ingest one parsed record.
    pub fn ingest(&mut self, record: &RawRecord) -> Result<(), PipelineError> {
        self.league
            .ingest(record)
            .map_err(|source| PipelineError::Ingest {
                line: record.line,
                source,
            })?;
        Ok(())
    }

    /// Read and ingest every matching record from `input`.
    ///
    /// Returns the number of matches ingested. Stops at the first bad line.
    pub fn read<R: BufRead>(&mut self, input: R) -> Result<usize, PipelineError> {
        let mut reader = RecordReader::new(
            input,
            self.config.header_label.as_str(),
            self.config.tag_filter.as_str(),
        );

        let mut ingested = 0;
        for record in reader.by_ref() {
            self.ingest(&record?)?;
            ingested += 1;
        }

        info!(
            "Ingested {} matches ({} skipped by tag filter {:?})",
            ingested,
            reader.skipped(),
            self.config.tag_filter
        );
        Ok(ingested)
    }

    /// Finalize statistics and rank every configured leaderboard.
    pub fn finish(mut self) -> Report {
        if self.league.matches().is_empty() {
            warn!("No matches ingested");
        }

        let window_len = self.config.min_matches;
        finalize_league(&mut self.league, window_len);

        let mut pool = QualificationPool::new(self.config.max_qualified);
        let boards = build_leaderboards(
            &self.config.leaderboards(),
            &self.league,
            window_len,
            &mut pool,
        );

        Report::new(
            &self.league,
            &boards,
            &pool,
            window_len,
            self.config.show_last_end_time,
        )
    }
}

/// Run the whole pipeline over `input`.
pub fn run<R: BufRead>(config: ReportConfig, input: R) -> Result<Report, PipelineError> {
    let mut pipeline = Pipeline::new(config);
    pipeline.read(input)?;
    Ok(pipeline.finish())
}
