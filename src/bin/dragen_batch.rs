use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use dragen_batch::config::{ResolvedRuns, Run, RunDescription, RunDescriptionLoader};
use dragen_batch::domain::{SampleId, SubjectId};
use dragen_batch::error::LayoutError;
use dragen_batch::output::{JsonOutput, ProjectReport, print_qc_files};
use dragen_batch::project::{Project, ProjectOptions};

#[derive(Parser)]
#[command(name = "dragen-batch")]
#[command(about = "Locate DRAGEN tumor/normal outputs and report them as a project")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Discover batches and print the project as JSON")]
    Discover(DiscoverArgs),
    #[command(about = "Print every QC file of the discovered project")]
    QcFiles(RunArgs),
}

#[derive(Args)]
struct DiscoverArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Write the JSON report to this file instead of stdout.
    #[arg(long)]
    output: Option<Utf8PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Run description JSON (defaults to ./dragen-runs.json).
    #[arg(long, conflicts_with = "subject_id")]
    config: Option<String>,

    #[arg(long, requires_all = ["tumor", "tumor_dir", "normal", "normal_dir"])]
    subject_id: Option<String>,

    #[arg(long, requires = "subject_id")]
    tumor: Option<String>,

    #[arg(long, requires = "subject_id")]
    tumor_dir: Option<Utf8PathBuf>,

    #[arg(long, requires = "subject_id")]
    tumor_prefix: Option<String>,

    #[arg(long, requires = "subject_id")]
    normal: Option<String>,

    #[arg(long, requires = "subject_id")]
    normal_dir: Option<Utf8PathBuf>,

    #[arg(long, requires = "subject_id")]
    normal_prefix: Option<String>,

    #[arg(long)]
    genome_build: Option<String>,

    #[arg(long)]
    project_name: Option<String>,

    /// Do not log found VCFs.
    #[arg(long)]
    silent: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<LayoutError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &LayoutError) -> u8 {
    match error {
        LayoutError::MissingQcFile(_) | LayoutError::InvalidFile { .. } => 2,
        LayoutError::InvalidSubjectId(_)
        | LayoutError::InvalidSampleId(_)
        | LayoutError::MissingRunDescription
        | LayoutError::RunDescriptionRead(_)
        | LayoutError::RunDescriptionParse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Discover(args) => {
            let project = build_project(&args.run)?;
            let report = ProjectReport::new(&project);
            match args.output {
                Some(path) => JsonOutput::write_project(&report, &path)?,
                None => JsonOutput::print_project(&report).into_diagnostic()?,
            }
            Ok(())
        }
        Commands::QcFiles(args) => {
            let project = build_project(&args)?;
            print_qc_files(&project).into_diagnostic()
        }
    }
}

fn build_project(args: &RunArgs) -> Result<Project, LayoutError> {
    let resolved = match &args.subject_id {
        Some(subject_id) => ResolvedRuns {
            genome_build: None,
            runs: vec![run_from_args(subject_id, args)?],
        },
        None => RunDescriptionLoader::resolve(args.config.as_deref())?,
    };
    let options = ProjectOptions {
        silent: args.silent,
        genome_build: args.genome_build.clone(),
        project_name: args.project_name.clone(),
    };
    Project::from_resolved(&resolved, &options)
}

fn run_from_args(subject_id: &str, args: &RunArgs) -> Result<RunDescription, LayoutError> {
    let tumor_normal_run = cli_run(&args.tumor, &args.tumor_dir, &args.tumor_prefix)?;
    let normal_run = cli_run(&args.normal, &args.normal_dir, &args.normal_prefix)?;
    Ok(RunDescription {
        subject_id: subject_id.parse::<SubjectId>()?,
        tumor_normal_run,
        normal_run,
    })
}

fn cli_run(
    sample_id: &Option<String>,
    dir: &Option<Utf8PathBuf>,
    prefix: &Option<String>,
) -> Result<Run, LayoutError> {
    // clap enforces presence through `requires_all`
    let sample_id = sample_id.as_deref().unwrap_or_default().parse::<SampleId>()?;
    let dir = dir.clone().unwrap_or_default();
    let run = Run::new(sample_id, dir);
    match prefix {
        Some(prefix) => Ok(run.with_prefix(prefix.parse()?)),
        None => Ok(run),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_need_subject_id() {
        let err = Cli::try_parse_from(["dragen-batch", "discover", "--tumor", "T1"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["dragen-batch", "qc-files", "--normal-prefix", "N1"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn explicit_run_parses() {
        let cli = Cli::try_parse_from([
            "dragen-batch",
            "discover",
            "--subject-id",
            "PATIENT1",
            "--tumor",
            "T1",
            "--tumor-dir",
            "/data/tn",
            "--normal",
            "N1",
            "--normal-dir",
            "/data/n",
        ])
        .unwrap();
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        let run = run_from_args("PATIENT1", &args.run).unwrap();
        assert_eq!(run.tumor_normal_run.prefix.as_str(), "T1");
        assert_eq!(run.normal_run.path, Utf8PathBuf::from("/data/n"));
    }
}
