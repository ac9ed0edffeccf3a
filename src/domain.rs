use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phenotype {
    Tumor,
    Normal,
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phenotype::Tumor => write!(f, "tumor"),
            Phenotype::Normal => write!(f, "normal"),
        }
    }
}

/// Engine that produced a batch's variant calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantCaller {
    Dragen,
}

impl fmt::Display for VariantCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantCaller::Dragen => write!(f, "dragen"),
        }
    }
}

/// Discovery progress of a batch. Stages only move forward, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchStage {
    Unresolved,
    VcfsResolved,
    SamplesAdded,
    QcResolved,
}

impl BatchStage {
    pub fn next(self) -> Option<BatchStage> {
        match self {
            BatchStage::Unresolved => Some(BatchStage::VcfsResolved),
            BatchStage::VcfsResolved => Some(BatchStage::SamplesAdded),
            BatchStage::SamplesAdded => Some(BatchStage::QcResolved),
            BatchStage::QcResolved => None,
        }
    }
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStage::Unresolved => write!(f, "unresolved"),
            BatchStage::VcfsResolved => write!(f, "vcfs-resolved"),
            BatchStage::SamplesAdded => write!(f, "samples-added"),
            BatchStage::QcResolved => write!(f, "qc-resolved"),
        }
    }
}

/// Subject identifier; names a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if !is_file_safe(trimmed) {
            return Err(LayoutError::InvalidSubjectId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Read-group / sample identifier. Doubles as a file-name stem, so it must not
/// contain path separators or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleId(String);

impl SampleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if !is_file_safe(trimmed) {
            return Err(LayoutError::InvalidSampleId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

fn is_file_safe(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|ch| !ch.is_whitespace() && !ch.is_control() && ch != '/' && ch != '\\')
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_sample_id_trims() {
        let id: SampleId = "  PRJ-T1 ".parse().unwrap();
        assert_eq!(id.as_str(), "PRJ-T1");
    }

    #[test]
    fn parse_sample_id_rejects_separators() {
        let err = "data/T1".parse::<SampleId>().unwrap_err();
        assert_matches!(err, LayoutError::InvalidSampleId(_));
        let err = "..".parse::<SampleId>().unwrap_err();
        assert_matches!(err, LayoutError::InvalidSampleId(_));
    }

    #[test]
    fn parse_subject_id_rejects_blank() {
        let err = "   ".parse::<SubjectId>().unwrap_err();
        assert_matches!(err, LayoutError::InvalidSubjectId(_));
    }

    #[test]
    fn stages_advance_in_order() {
        assert_eq!(BatchStage::Unresolved.next(), Some(BatchStage::VcfsResolved));
        assert_eq!(BatchStage::QcResolved.next(), None);
        assert!(BatchStage::SamplesAdded < BatchStage::QcResolved);
    }
}
