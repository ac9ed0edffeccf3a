//! File naming conventions of DRAGEN output directories.
//!
//! Every template is `{dir}/{prefix}{suffix}`; the suffixes must match the
//! engine's output byte for byte.

use camino::{Utf8Path, Utf8PathBuf};

/// Small-variant calls, used for both the somatic and the germline run.
pub const HARD_FILTERED_VCF: &str = ".hard-filtered.vcf.gz";
/// Structural-variant calls of the tumor/normal run.
pub const SV_VCF: &str = ".sv.vcf.gz";
/// Tumor alignment in the tumor/normal run.
pub const TUMOR_BAM: &str = "_tumor.bam";
/// Normal alignment in the normal run.
pub const NORMAL_BAM: &str = ".bam";

/// QC metrics written for both the tumor and the normal sample.
pub const QC_SHARED: &[&str] = &[
    ".vc_metrics.csv",
    ".ploidy_estimation_metrics.csv",
    ".mapping_metrics.csv",
    ".fragment_length_hist.csv",
];

pub const QC_TUMOR_ONLY: &[&str] = &[
    ".wgs_fine_hist_tumor.csv",
    ".wgs_coverage_metrics_tumor.csv",
    ".wgs_contig_mean_cov_tumor.csv",
];

pub const QC_NORMAL_ONLY: &[&str] = &[
    ".wgs_fine_hist.csv",
    ".wgs_coverage_metrics.csv",
    ".wgs_contig_mean_cov.csv",
];

pub fn prefixed(dir: &Utf8Path, prefix: &str, suffix: &str) -> Utf8PathBuf {
    dir.join(format!("{prefix}{suffix}"))
}

pub fn somatic_vcf_path(tn_dir: &Utf8Path, tn_prefix: &str) -> Utf8PathBuf {
    prefixed(tn_dir, tn_prefix, HARD_FILTERED_VCF)
}

pub fn germline_vcf_path(n_dir: &Utf8Path, n_prefix: &str) -> Utf8PathBuf {
    prefixed(n_dir, n_prefix, HARD_FILTERED_VCF)
}

pub fn sv_vcf_path(tn_dir: &Utf8Path, tn_prefix: &str) -> Utf8PathBuf {
    prefixed(tn_dir, tn_prefix, SV_VCF)
}

pub fn tumor_bam_path(tn_dir: &Utf8Path, tn_prefix: &str) -> Utf8PathBuf {
    prefixed(tn_dir, tn_prefix, TUMOR_BAM)
}

pub fn normal_bam_path(n_dir: &Utf8Path, n_prefix: &str) -> Utf8PathBuf {
    prefixed(n_dir, n_prefix, NORMAL_BAM)
}

/// Shared suffixes first, then the tumor-only ones.
pub fn tumor_qc_suffixes() -> impl Iterator<Item = &'static str> {
    QC_SHARED.iter().chain(QC_TUMOR_ONLY).copied()
}

/// Shared suffixes first, then the normal-only ones.
pub fn normal_qc_suffixes() -> impl Iterator<Item = &'static str> {
    QC_SHARED.iter().chain(QC_NORMAL_ONLY).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates() {
        let tn = Utf8Path::new("/data/tn");
        let n = Utf8Path::new("/data/n");
        assert_eq!(
            somatic_vcf_path(tn, "T1"),
            Utf8PathBuf::from("/data/tn/T1.hard-filtered.vcf.gz")
        );
        assert_eq!(
            germline_vcf_path(n, "N1"),
            Utf8PathBuf::from("/data/n/N1.hard-filtered.vcf.gz")
        );
        assert_eq!(sv_vcf_path(tn, "T1"), Utf8PathBuf::from("/data/tn/T1.sv.vcf.gz"));
        assert_eq!(tumor_bam_path(tn, "T1"), Utf8PathBuf::from("/data/tn/T1_tumor.bam"));
        assert_eq!(normal_bam_path(n, "N1"), Utf8PathBuf::from("/data/n/N1.bam"));
    }

    #[test]
    fn qc_suffix_order() {
        let tumor = tumor_qc_suffixes().collect::<Vec<_>>();
        assert_eq!(tumor.len(), 7);
        assert_eq!(tumor[0], ".vc_metrics.csv");
        assert_eq!(tumor[4], ".wgs_fine_hist_tumor.csv");

        let normal = normal_qc_suffixes().collect::<Vec<_>>();
        assert_eq!(normal.len(), 7);
        assert_eq!(normal[6], ".wgs_contig_mean_cov.csv");
    }
}
