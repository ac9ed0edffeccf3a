use assert_matches::assert_matches;

use dragen_batch::domain::{BatchStage, Phenotype, SampleId, SubjectId, VariantCaller};
use dragen_batch::error::LayoutError;

#[test]
fn parse_subject_id_valid() {
    let id: SubjectId = "SBJ00001".parse().unwrap();
    assert_eq!(id.as_str(), "SBJ00001");
    assert_eq!(id.to_string(), "SBJ00001");
}

#[test]
fn parse_subject_id_invalid() {
    let err = "SBJ 1".parse::<SubjectId>().unwrap_err();
    assert_matches!(err, LayoutError::InvalidSubjectId(_));
}

#[test]
fn parse_sample_id_invalid() {
    let err = "a\\b".parse::<SampleId>().unwrap_err();
    assert_matches!(err, LayoutError::InvalidSampleId(_));
    let err = "".parse::<SampleId>().unwrap_err();
    assert_matches!(err, LayoutError::InvalidSampleId(_));
}

#[test]
fn display_names() {
    assert_eq!(Phenotype::Tumor.to_string(), "tumor");
    assert_eq!(Phenotype::Normal.to_string(), "normal");
    assert_eq!(VariantCaller::Dragen.to_string(), "dragen");
    assert_eq!(BatchStage::SamplesAdded.to_string(), "samples-added");
}

#[test]
fn stage_sequence() {
    let mut stage = BatchStage::Unresolved;
    let mut seen = vec![stage];
    while let Some(next) = stage.next() {
        seen.push(next);
        stage = next;
    }
    assert_eq!(
        seen,
        vec![
            BatchStage::Unresolved,
            BatchStage::VcfsResolved,
            BatchStage::SamplesAdded,
            BatchStage::QcResolved,
        ]
    );
}
