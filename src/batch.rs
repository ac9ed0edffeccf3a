use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RunDescription;
use crate::domain::{BatchStage, Phenotype, SampleId, VariantCaller};
use crate::error::LayoutError;
use crate::fs_util::{is_regular_file, path_exists, verify_file};
use crate::layout;
use crate::project::SampleRegistry;
use crate::sample::Sample;

const SOMATIC_VCF: u8 = 0b001;
const GERMLINE_VCF: u8 = 0b010;
const SV_VCF: u8 = 0b100;
const ALL_VCFS: u8 = SOMATIC_VCF | GERMLINE_VCF | SV_VCF;

/// Directories and file-name prefixes of the two runs behind a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunLayout {
    pub tumor_normal_dir: Utf8PathBuf,
    pub tumor_normal_prefix: SampleId,
    pub normal_dir: Utf8PathBuf,
    pub normal_prefix: SampleId,
}

impl RunLayout {
    pub fn from_description(run: &RunDescription) -> Self {
        Self {
            tumor_normal_dir: run.tumor_normal_run.path.clone(),
            tumor_normal_prefix: run.tumor_normal_run.prefix.clone(),
            normal_dir: run.normal_run.path.clone(),
            normal_prefix: run.normal_run.prefix.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub name: String,
    layout: Option<RunLayout>,
    pub somatic_caller: VariantCaller,
    pub germline_caller: VariantCaller,
    pub sv_caller: VariantCaller,
    pub somatic_vcf_path: Option<Utf8PathBuf>,
    pub germline_vcf_path: Option<Utf8PathBuf>,
    pub sv_vcf_path: Option<Utf8PathBuf>,
    pub tumor_sample: Option<Sample>,
    pub normal_sample: Option<Sample>,
    pub batch_level_qc_files: Vec<Utf8PathBuf>,
    stage: BatchStage,
    #[serde(skip)]
    resolved_vcfs: u8,
}

impl Batch {
    pub fn new(name: impl Into<String>, layout: RunLayout) -> Self {
        let mut batch = Self::stub(name);
        batch.layout = Some(layout);
        batch
    }

    /// A named batch with no run directories; nothing can be resolved on it.
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: None,
            somatic_caller: VariantCaller::Dragen,
            germline_caller: VariantCaller::Dragen,
            sv_caller: VariantCaller::Dragen,
            somatic_vcf_path: None,
            germline_vcf_path: None,
            sv_vcf_path: None,
            tumor_sample: None,
            normal_sample: None,
            batch_level_qc_files: Vec::new(),
            stage: BatchStage::Unresolved,
            resolved_vcfs: 0,
        }
    }

    pub fn layout(&self) -> Result<&RunLayout, LayoutError> {
        self.layout
            .as_ref()
            .ok_or_else(|| LayoutError::UnboundBatch(self.name.clone()))
    }

    pub fn stage(&self) -> BatchStage {
        self.stage
    }

    pub fn tumor_normal_base_dir(&self) -> Option<&Utf8Path> {
        self.layout.as_ref().map(|l| l.tumor_normal_dir.as_path())
    }

    pub fn normal_base_dir(&self) -> Option<&Utf8Path> {
        self.layout.as_ref().map(|l| l.normal_dir.as_path())
    }

    pub fn resolve_somatic_vcf(&mut self, silent: bool) -> Result<(), LayoutError> {
        let layout = self.layout()?;
        let candidate =
            layout::somatic_vcf_path(&layout.tumor_normal_dir, layout.tumor_normal_prefix.as_str());
        self.somatic_vcf_path = resolve_vcf(candidate, "somatic", silent)?;
        self.mark_vcf_resolved(SOMATIC_VCF)
    }

    pub fn resolve_germline_vcf(&mut self, silent: bool) -> Result<(), LayoutError> {
        let layout = self.layout()?;
        let candidate =
            layout::germline_vcf_path(&layout.normal_dir, layout.normal_prefix.as_str());
        self.germline_vcf_path = resolve_vcf(candidate, "germline", silent)?;
        self.mark_vcf_resolved(GERMLINE_VCF)
    }

    pub fn resolve_sv_vcf(&mut self, silent: bool) -> Result<(), LayoutError> {
        let layout = self.layout()?;
        let candidate =
            layout::sv_vcf_path(&layout.tumor_normal_dir, layout.tumor_normal_prefix.as_str());
        self.sv_vcf_path = resolve_vcf(candidate, "SV", silent)?;
        self.mark_vcf_resolved(SV_VCF)
    }

    /// Resolves the somatic, germline and SV calls, in that order.
    pub fn resolve_variant_files(&mut self, silent: bool) -> Result<(), LayoutError> {
        self.resolve_somatic_vcf(silent)?;
        self.resolve_germline_vcf(silent)?;
        self.resolve_sv_vcf(silent)
    }

    pub fn add_tumor(
        &mut self,
        registry: &mut SampleRegistry,
        rgid: SampleId,
    ) -> Result<&Sample, LayoutError> {
        self.check_accepts_samples()?;
        let layout = self.layout()?;
        let mut sample = Sample::new(rgid, Phenotype::Tumor, self.name.clone());
        sample.alignment_path = Some(layout::tumor_bam_path(
            &layout.tumor_normal_dir,
            layout.tumor_normal_prefix.as_str(),
        ));
        registry.register(&sample);
        self.tumor_sample = Some(sample);
        self.advance_if_paired()?;
        self.tumor_sample
            .as_ref()
            .ok_or_else(|| self.missing_sample(Phenotype::Tumor))
    }

    pub fn add_normal(
        &mut self,
        registry: &mut SampleRegistry,
        rgid: SampleId,
    ) -> Result<&Sample, LayoutError> {
        self.check_accepts_samples()?;
        let layout = self.layout()?;
        let mut sample = Sample::new(rgid, Phenotype::Normal, self.name.clone());
        sample.alignment_path = Some(layout::normal_bam_path(
            &layout.normal_dir,
            layout.normal_prefix.as_str(),
        ));
        registry.register(&sample);
        self.normal_sample = Some(sample);
        self.advance_if_paired()?;
        self.normal_sample
            .as_ref()
            .ok_or_else(|| self.missing_sample(Phenotype::Normal))
    }

    /// Collects every per-sample QC file. Each one must exist; the first
    /// missing file aborts and leaves both samples' QC lists untouched.
    pub fn resolve_qc_files(&mut self) -> Result<(), LayoutError> {
        self.check_reachable(BatchStage::QcResolved)?;
        let layout = self.layout()?;
        if self.tumor_sample.is_none() {
            return Err(self.missing_sample(Phenotype::Tumor));
        }
        if self.normal_sample.is_none() {
            return Err(self.missing_sample(Phenotype::Normal));
        }

        let tumor_qc = collect_qc_files(
            &layout.tumor_normal_dir,
            layout.tumor_normal_prefix.as_str(),
            layout::tumor_qc_suffixes(),
        )?;
        let normal_qc = collect_qc_files(
            &layout.normal_dir,
            layout.normal_prefix.as_str(),
            layout::normal_qc_suffixes(),
        )?;

        if let Some(tumor) = self.tumor_sample.as_mut() {
            tumor.qc_files = tumor_qc;
        }
        if let Some(normal) = self.normal_sample.as_mut() {
            normal.qc_files = normal_qc;
        }
        self.advance(BatchStage::QcResolved)
    }

    /// Batch-level QC files, then the tumor's, then the normal's.
    pub fn all_qc_files(&self) -> Vec<&Utf8Path> {
        let tumor = self.tumor_sample.iter().flat_map(|s| s.qc_files.iter());
        let normal = self.normal_sample.iter().flat_map(|s| s.qc_files.iter());
        self.batch_level_qc_files
            .iter()
            .chain(tumor)
            .chain(normal)
            .map(|path| path.as_path())
            .collect()
    }

    pub fn sample_named(&self, name: &str) -> Option<&Sample> {
        self.tumor_sample
            .iter()
            .chain(self.normal_sample.iter())
            .find(|sample| sample.name == name)
    }

    fn missing_sample(&self, phenotype: Phenotype) -> LayoutError {
        LayoutError::MissingSample {
            batch: self.name.clone(),
            phenotype,
        }
    }

    // The stage only moves once all three VCF kinds have been looked up.
    fn mark_vcf_resolved(&mut self, kind: u8) -> Result<(), LayoutError> {
        self.resolved_vcfs |= kind;
        if self.resolved_vcfs == ALL_VCFS {
            self.advance(BatchStage::VcfsResolved)?;
        }
        Ok(())
    }

    /// Samples can be set or replaced until QC files are resolved; after that
    /// a new sample would have no QC files.
    fn check_accepts_samples(&self) -> Result<(), LayoutError> {
        if self.stage == BatchStage::QcResolved {
            return Err(LayoutError::InvalidStage {
                batch: self.name.clone(),
                from: self.stage,
                to: BatchStage::SamplesAdded,
            });
        }
        self.check_reachable(BatchStage::SamplesAdded)
    }

    fn advance_if_paired(&mut self) -> Result<(), LayoutError> {
        if self.tumor_sample.is_some() && self.normal_sample.is_some() {
            self.advance(BatchStage::SamplesAdded)?;
        }
        Ok(())
    }

    fn check_reachable(&self, to: BatchStage) -> Result<(), LayoutError> {
        if self.stage >= to || self.stage.next() == Some(to) {
            return Ok(());
        }
        Err(LayoutError::InvalidStage {
            batch: self.name.clone(),
            from: self.stage,
            to,
        })
    }

    // Repeating an earlier step keeps the later stage.
    fn advance(&mut self, to: BatchStage) -> Result<(), LayoutError> {
        if self.stage >= to {
            return Ok(());
        }
        self.check_reachable(to)?;
        debug!(batch = %self.name, from = %self.stage, to = %to, "batch stage");
        self.stage = to;
        Ok(())
    }
}

fn resolve_vcf(
    candidate: Utf8PathBuf,
    label: &str,
    silent: bool,
) -> Result<Option<Utf8PathBuf>, LayoutError> {
    if !is_regular_file(&candidate) {
        if !silent {
            info!("No {label} VCF at {candidate}");
        }
        return Ok(None);
    }
    verify_file(&candidate)?;
    if !silent {
        info!("Found {label} VCF: {candidate}");
    }
    Ok(Some(candidate))
}

fn collect_qc_files<'a>(
    dir: &Utf8Path,
    prefix: &str,
    suffixes: impl Iterator<Item = &'a str>,
) -> Result<Vec<Utf8PathBuf>, LayoutError> {
    suffixes
        .map(|suffix| {
            let qc_file = layout::prefixed(dir, prefix, suffix);
            if !path_exists(&qc_file) {
                return Err(LayoutError::MissingQcFile(qc_file));
            }
            Ok(qc_file)
        })
        .collect()
}
