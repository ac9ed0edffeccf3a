use std::cmp::Ordering;
use std::sync::LazyLock;

use camino::Utf8PathBuf;
use regex::Regex;
use serde::Serialize;

use crate::domain::{Phenotype, SampleId};

static NAME_CHUNK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+|\D+").unwrap());

/// One biological sample of a batch. `batch` names the owning batch in the
/// project's batch map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub name: String,
    pub rgid: SampleId,
    pub phenotype: Phenotype,
    pub batch: String,
    pub alignment_path: Option<Utf8PathBuf>,
    pub qc_files: Vec<Utf8PathBuf>,
}

impl Sample {
    pub fn new(rgid: SampleId, phenotype: Phenotype, batch: impl Into<String>) -> Self {
        Self {
            name: rgid.as_str().to_string(),
            rgid,
            phenotype,
            batch: batch.into(),
            alignment_path: None,
            qc_files: Vec::new(),
        }
    }
}

/// Natural ordering of sample names: digit runs compare numerically, so
/// `S2` sorts before `S10`.
pub fn sample_name_cmp(a: &str, b: &str) -> Ordering {
    let mut left = NAME_CHUNK.find_iter(a).map(|m| m.as_str());
    let mut right = NAME_CHUNK.find_iter(b).map(|m| m.as_str());
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = chunk_cmp(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn chunk_cmp(x: &str, y: &str) -> Ordering {
    let numeric = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if numeric(x) && numeric(y) {
        let xs = x.trim_start_matches('0');
        let ys = y.trim_start_matches('0');
        xs.len().cmp(&ys.len()).then_with(|| xs.cmp(ys))
    } else {
        x.to_lowercase().cmp(&y.to_lowercase())
    }
}
