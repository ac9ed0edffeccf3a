use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::batch::{Batch, RunLayout};
use crate::config::{ResolvedRuns, RunDescription};
use crate::domain::SampleId;
use crate::error::LayoutError;
use crate::sample::Sample;

/// Identifies a sample by the batch that owns it and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleKey {
    pub batch: String,
    pub name: String,
}

/// Insertion-ordered sample list, unique by sample name. The first
/// registration of a name wins.
#[derive(Debug, Clone, Default)]
pub struct SampleRegistry {
    keys: Vec<SampleKey>,
}

impl SampleRegistry {
    /// Returns `false` when a sample with that name is already registered.
    pub fn register(&mut self, sample: &Sample) -> bool {
        if self.contains(&sample.name) {
            return false;
        }
        self.keys.push(SampleKey {
            batch: sample.batch.clone(),
            name: sample.name.clone(),
        });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.iter().any(|key| key.name == name)
    }

    pub fn merge(&mut self, other: SampleRegistry) {
        for key in other.keys {
            if !self.contains(&key.name) {
                self.keys.push(key);
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.name.as_str())
    }

    pub fn keys(&self) -> &[SampleKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Suppress the per-VCF info lines.
    pub silent: bool,
}

/// Result of discovering one run description.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub batches: BTreeMap<String, Batch>,
    pub samples: SampleRegistry,
}

/// Builds the fully resolved batch for one run description.
///
/// Variant calls are resolved first because their absence is tolerated;
/// QC files are resolved last and any missing one fails the whole call.
pub fn discover(
    run: &RunDescription,
    options: &DiscoverOptions,
) -> Result<Discovery, LayoutError> {
    let name = run.subject_id.as_str().to_string();
    debug!(
        batch = %name,
        tumor_normal = %run.tumor_normal_run.path,
        normal = %run.normal_run.path,
        "discovering batch"
    );

    let mut samples = SampleRegistry::default();
    let mut batch = Batch::new(name.clone(), RunLayout::from_description(run));
    batch.resolve_variant_files(options.silent)?;
    batch.add_tumor(&mut samples, run.tumor_normal_run.sample_id.clone())?;
    batch.add_normal(&mut samples, run.normal_run.sample_id.clone())?;
    batch.resolve_qc_files()?;

    Ok(Discovery {
        batches: BTreeMap::from([(name, batch)]),
        samples,
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub silent: bool,
    pub genome_build: Option<String>,
    /// Required when the project holds more than one batch.
    pub project_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub project_name: String,
    pub genome_build: Option<String>,
    batches: BTreeMap<String, Batch>,
    samples: SampleRegistry,
}

impl Project {
    pub fn new(run: &RunDescription, options: &ProjectOptions) -> Result<Self, LayoutError> {
        Self::from_runs(std::slice::from_ref(run), options)
    }

    pub fn from_resolved(
        resolved: &ResolvedRuns,
        options: &ProjectOptions,
    ) -> Result<Self, LayoutError> {
        let options = ProjectOptions {
            genome_build: options
                .genome_build
                .clone()
                .or_else(|| resolved.genome_build.clone()),
            ..options.clone()
        };
        Self::from_runs(&resolved.runs, &options)
    }

    /// Discovers every run and merges the batches. Nothing is kept if any
    /// run fails.
    pub fn from_runs(
        runs: &[RunDescription],
        options: &ProjectOptions,
    ) -> Result<Self, LayoutError> {
        let discover_options = DiscoverOptions {
            silent: options.silent,
        };

        let mut batches = BTreeMap::new();
        let mut samples = SampleRegistry::default();
        for run in runs {
            let discovery = discover(run, &discover_options)?;
            for (name, batch) in discovery.batches {
                if batches.contains_key(&name) {
                    return Err(LayoutError::DuplicateBatch(name));
                }
                batches.insert(name, batch);
            }
            samples.merge(discovery.samples);
        }

        let project_name = match (&options.project_name, batches.len()) {
            (Some(name), _) => name.clone(),
            (None, 1) => batches.keys().next().cloned().unwrap_or_default(),
            (None, count) => return Err(LayoutError::AmbiguousProjectName(count)),
        };
        debug!(project = %project_name, batches = batches.len(), "project assembled");

        Ok(Self {
            project_name,
            genome_build: options.genome_build.clone(),
            batches,
            samples,
        })
    }

    /// Registers an empty batch under `name`. An existing batch of that name
    /// is kept as it is, not replaced, and returned.
    pub fn add_batch(&mut self, name: &str) -> &mut Batch {
        self.batches
            .entry(name.to_string())
            .or_insert_with(|| Batch::stub(name))
    }

    pub fn add_tumor(&mut self, batch: &str, rgid: SampleId) -> Result<&Sample, LayoutError> {
        let target = self
            .batches
            .get_mut(batch)
            .ok_or_else(|| LayoutError::UnboundBatch(batch.to_string()))?;
        target.add_tumor(&mut self.samples, rgid)
    }

    pub fn add_normal(&mut self, batch: &str, rgid: SampleId) -> Result<&Sample, LayoutError> {
        let target = self
            .batches
            .get_mut(batch)
            .ok_or_else(|| LayoutError::UnboundBatch(batch.to_string()))?;
        target.add_normal(&mut self.samples, rgid)
    }

    pub fn batches(&self) -> &BTreeMap<String, Batch> {
        &self.batches
    }

    pub fn batch(&self, name: &str) -> Option<&Batch> {
        self.batches.get(name)
    }

    pub fn batch_mut(&mut self, name: &str) -> Option<&mut Batch> {
        self.batches.get_mut(name)
    }

    pub fn sample_registry(&self) -> &SampleRegistry {
        &self.samples
    }

    /// Samples in registration order.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.keys().iter().filter_map(|key| {
            self.batches
                .get(&key.batch)
                .and_then(|batch| batch.sample_named(&key.name))
        })
    }

    pub fn samples_sorted_by<F>(&self, mut cmp: F) -> Vec<&Sample>
    where
        F: FnMut(&Sample, &Sample) -> Ordering,
    {
        let mut samples = self.samples().collect::<Vec<_>>();
        samples.sort_by(|a, b| cmp(*a, *b));
        samples
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Phenotype;

    use super::*;

    #[test]
    fn registry_dedups_by_name() {
        let mut registry = SampleRegistry::default();
        let first = Sample::new("S1".parse().unwrap(), Phenotype::Tumor, "A");
        let again = Sample::new("S1".parse().unwrap(), Phenotype::Normal, "B");
        let other = Sample::new("S2".parse().unwrap(), Phenotype::Normal, "A");

        assert!(registry.register(&first));
        assert!(!registry.register(&again));
        assert!(registry.register(&other));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.keys()[0].batch, "A");
    }

    #[test]
    fn merge_keeps_first_registration() {
        let mut left = SampleRegistry::default();
        left.register(&Sample::new("S1".parse().unwrap(), Phenotype::Tumor, "A"));
        let mut right = SampleRegistry::default();
        right.register(&Sample::new("S1".parse().unwrap(), Phenotype::Tumor, "B"));
        right.register(&Sample::new("S3".parse().unwrap(), Phenotype::Normal, "B"));

        left.merge(right);
        assert_eq!(left.names().collect::<Vec<_>>(), vec!["S1", "S3"]);
        assert_eq!(left.keys()[0].batch, "A");
    }

    #[test]
    fn add_batch_registers_stub_once() {
        let mut project = Project {
            project_name: "P".to_string(),
            genome_build: None,
            batches: BTreeMap::new(),
            samples: SampleRegistry::default(),
        };
        project.add_batch("B1").batch_level_qc_files.push("x.csv".into());
        let again = project.add_batch("B1");
        assert_eq!(again.batch_level_qc_files.len(), 1);
        assert_eq!(project.batches().len(), 1);
        assert_eq!(project.project_name, "P");
    }
}
