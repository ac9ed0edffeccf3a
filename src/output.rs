use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use chrono::Utc;
use serde::Serialize;

use crate::batch::Batch;
use crate::error::LayoutError;
use crate::project::Project;
use crate::sample::Sample;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport<'a> {
    pub project_name: &'a str,
    pub genome_build: Option<&'a str>,
    pub generated_at: String,
    pub batches: Vec<&'a Batch>,
    pub samples: Vec<&'a Sample>,
}

impl<'a> ProjectReport<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project_name: &project.project_name,
            genome_build: project.genome_build.as_deref(),
            generated_at: Utc::now().to_rfc3339(),
            batches: project.batches().values().collect(),
            samples: project.samples().collect(),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_project(report: &ProjectReport<'_>) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(&Self::render(report)?)?;
        Ok(())
    }

    /// Writes the report next to `path` first and renames it into place.
    pub fn write_project(report: &ProjectReport<'_>, path: &Utf8Path) -> Result<(), LayoutError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| LayoutError::Filesystem(err.to_string()))?;
        let content = Self::render(report).map_err(|err| LayoutError::Filesystem(err.to_string()))?;

        let mut temp = tempfile::Builder::new()
            .prefix("dragen-batch-report")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| LayoutError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| LayoutError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| LayoutError::Filesystem(err.to_string()))?;
        Ok(())
    }

    fn render<T: Serialize>(value: &T) -> io::Result<Vec<u8>> {
        let mut json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
        json.push(b'\n');
        Ok(json)
    }
}

/// Every QC file of the project, one per line, batches in name order.
pub fn print_qc_files(project: &Project) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for batch in project.batches().values() {
        for path in batch.all_qc_files() {
            writeln!(stdout, "{path}")?;
        }
    }
    Ok(())
}
