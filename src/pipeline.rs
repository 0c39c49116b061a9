use std::path::PathBuf;

use crate::{
    config::Config,
    dispatch::Strategy,
    error::{ConfigError, FileError, ValidationError},
    extractor::ContentExtractor,
    models::{RenamePlan, SourceFile},
    naming::ConventionRules,
    providers::SuggestionProvider,
    renamer,
    resolver::{parent_dir, NameReservations},
    scratch::{RetentionPolicy, ScratchDir},
    validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    /// Compute plans, touch nothing.
    DryRun,
}

#[derive(Debug)]
pub enum Outcome {
    Renamed(PathBuf),
    Planned(RenamePlan),
    Skipped(FileError),
}

#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcome: Outcome,
    /// Scratch directory left on disk under `RetentionPolicy::Retain`.
    pub retained: Option<PathBuf>,
}

/// The content-to-name pipeline. Everything it needs comes in through
/// `new`; nothing is looked up from ambient state.
pub struct Pipeline<'a> {
    provider: &'a dyn SuggestionProvider,
    extractor: &'a dyn ContentExtractor,
    rules: ConventionRules,
    reservations: NameReservations,
    retention: RetentionPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &Config,
        provider: &'a dyn SuggestionProvider,
        extractor: &'a dyn ContentExtractor,
        retention: RetentionPolicy,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            provider,
            extractor,
            rules: config.naming_rules()?,
            reservations: NameReservations::new(),
            retention,
        })
    }

    pub fn rules(&self) -> &ConventionRules {
        &self.rules
    }

    /// Run one file end to end. Every failure is folded into the report.
    pub async fn process(&self, file: &SourceFile, mode: Mode) -> FileReport {
        let scratch = match ScratchDir::acquire(self.retention) {
            Ok(scratch) => scratch,
            Err(e) => {
                return FileReport {
                    source: file.path.clone(),
                    outcome: Outcome::Skipped(FileError::Scratch(e)),
                    retained: None,
                }
            }
        };

        let planned = self.plan(file, &scratch).await;
        let retained = scratch.finish();

        let outcome = match (planned, mode) {
            (Err(e), _) => Outcome::Skipped(e),
            (Ok(plan), Mode::DryRun) => Outcome::Planned(plan),
            (Ok(plan), Mode::Execute) => match renamer::execute(&plan) {
                Ok(target) => Outcome::Renamed(target),
                Err(e) => Outcome::Skipped(e.into()),
            },
        };

        FileReport {
            source: file.path.clone(),
            outcome,
            retained,
        }
    }

    /// Extract, suggest, validate and resolve. The extracted content is
    /// dropped before this returns.
    pub async fn plan(&self, file: &SourceFile, scratch: &ScratchDir) -> Result<RenamePlan, FileError> {
        let content = self.extractor.extract(file, scratch)?;
        let strategy = Strategy::select(content);
        tracing::debug!("{}: {} strategy", file.path.display(), strategy.name());

        let suggestions = strategy.suggest(&self.rules, self.provider).await?;
        drop(strategy);

        let candidates = validator::filter_candidates(&suggestions, &self.rules)?;

        let dir = parent_dir(&file.path);
        let (target_name, resolution) = self
            .reservations
            .reserve(&dir, &candidates, file.extension())
            .map_err(|source| FileError::Directory {
                path: dir.clone(),
                source,
            })?
            .ok_or_else(|| ValidationError {
                convention: self.rules.convention.to_string(),
                rejected: Vec::new(),
            })?;

        Ok(RenamePlan {
            source: file.path.clone(),
            target_name,
            resolution,
        })
    }
}

/// Carry out the plans of a dry run exactly as they were computed. Nothing is
/// extracted and no provider is asked again.
pub fn apply_plans(reports: &mut [FileReport]) {
    for report in reports.iter_mut() {
        let Outcome::Planned(plan) = &report.outcome else {
            continue;
        };
        report.outcome = match renamer::execute(plan) {
            Ok(target) => Outcome::Renamed(target),
            Err(e) => Outcome::Skipped(e.into()),
        };
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub renamed: usize,
    pub planned: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        reports
            .iter()
            .fold(BatchSummary::default(), |mut summary, report| {
                match report.outcome {
                    Outcome::Renamed(_) => summary.renamed += 1,
                    Outcome::Planned(_) => summary.planned += 1,
                    Outcome::Skipped(_) => summary.skipped += 1,
                }
                summary
            })
    }
}
