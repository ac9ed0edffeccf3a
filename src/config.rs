use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{SampleId, SubjectId};
use crate::error::LayoutError;

pub const DEFAULT_RUN_DESCRIPTION: &str = "dragen-runs.json";

#[derive(Debug, Deserialize, Serialize)]
pub struct RunFile {
    #[serde(default)]
    pub genome_build: Option<String>,
    #[serde(flatten)]
    pub runs: RunList,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RunList {
    Many { runs: Vec<RunEntry> },
    Single(RunEntry),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RunEntry {
    pub subject_id: String,
    pub tumor_normal_run: RunDirEntry,
    pub normal_run: RunDirEntry,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RunDirEntry {
    #[serde(alias = "tumor", alias = "normal")]
    pub sample_id: String,
    pub path: Utf8PathBuf,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// One sequencing run: the read-group id, the file-name prefix and the
/// directory the engine wrote to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub sample_id: SampleId,
    pub prefix: SampleId,
    pub path: Utf8PathBuf,
}

impl Run {
    pub fn new(sample_id: SampleId, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            prefix: sample_id.clone(),
            sample_id,
            path: path.into(),
        }
    }

    pub fn with_prefix(mut self, prefix: SampleId) -> Self {
        self.prefix = prefix;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescription {
    pub subject_id: SubjectId,
    pub tumor_normal_run: Run,
    pub normal_run: Run,
}

#[derive(Debug, Clone)]
pub struct ResolvedRuns {
    pub genome_build: Option<String>,
    pub runs: Vec<RunDescription>,
}

pub struct RunDescriptionLoader;

impl RunDescriptionLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedRuns, LayoutError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from(DEFAULT_RUN_DESCRIPTION),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Err(LayoutError::MissingRunDescription);
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| LayoutError::RunDescriptionRead(config_path.clone()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<ResolvedRuns, LayoutError> {
        let file: RunFile = serde_json::from_str(content)
            .map_err(|err| LayoutError::RunDescriptionParse(err.to_string()))?;
        Self::resolve_config(file)
    }

    pub fn resolve_config(file: RunFile) -> Result<ResolvedRuns, LayoutError> {
        let entries = match file.runs {
            RunList::Many { runs } => runs,
            RunList::Single(entry) => vec![entry],
        };
        if entries.is_empty() {
            return Err(LayoutError::RunDescriptionParse(
                "no runs described".to_string(),
            ));
        }

        let runs = entries
            .into_iter()
            .map(|entry| {
                Ok(RunDescription {
                    subject_id: entry.subject_id.parse()?,
                    tumor_normal_run: resolve_run(entry.tumor_normal_run)?,
                    normal_run: resolve_run(entry.normal_run)?,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        let genome_build = file
            .genome_build
            .map(|build| build.trim().to_string())
            .filter(|build| !build.is_empty());

        Ok(ResolvedRuns { genome_build, runs })
    }
}

fn resolve_run(entry: RunDirEntry) -> Result<Run, LayoutError> {
    let run = Run::new(entry.sample_id.parse()?, entry.path);
    match entry.prefix {
        Some(prefix) => Ok(run.with_prefix(prefix.parse()?)),
        None => Ok(run),
    }
}
