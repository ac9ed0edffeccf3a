use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use crate::domain::{BatchStage, Phenotype};

#[derive(Debug, Error, Diagnostic)]
pub enum LayoutError {
    #[error("invalid subject id: {0}")]
    InvalidSubjectId(String),

    #[error("invalid sample id: {0}")]
    InvalidSampleId(String),

    #[error("missing run description dragen-runs.json in current directory")]
    MissingRunDescription,

    #[error("failed to read run description at {0}")]
    RunDescriptionRead(Utf8PathBuf),

    #[error("failed to parse run description: {0}")]
    RunDescriptionParse(String),

    #[error("invalid file {path}: {reason}")]
    #[diagnostic(help("the file exists but is unusable; re-run or re-copy the DRAGEN output"))]
    InvalidFile { path: Utf8PathBuf, reason: String },

    #[error("DRAGEN QC file '{0}' does not exist")]
    #[diagnostic(help("every per-sample QC metrics file must be present"))]
    MissingQcFile(Utf8PathBuf),

    #[error("batch {batch} has no {phenotype} sample")]
    MissingSample { batch: String, phenotype: Phenotype },

    #[error("batch {0} has no run directories attached")]
    UnboundBatch(String),

    #[error("batch {batch} cannot move from {from} to {to}")]
    InvalidStage {
        batch: String,
        from: BatchStage,
        to: BatchStage,
    },

    #[error("project has {0} batches; a project name must be given explicitly")]
    AmbiguousProjectName(usize),

    #[error("batch {0} is described more than once")]
    DuplicateBatch(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
