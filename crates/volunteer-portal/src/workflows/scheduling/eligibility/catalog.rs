use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::classifier::ProgramId;

const TIER1_MODULES: &[&str] = &["hmc_orientation", "volunteer_champion_intro"];

const TIER2_MODULES: &[&str] = &[
    "hipaa_training",
    "core_volunteer_workshop",
    "volunteer_survey",
    "portal_walkthrough",
];

const STREET_MEDICINE_MODULES: &[&str] = &[
    "smo_field_safety",
    "smo_harm_reduction",
    "smo_wound_care_basics",
];
const CLINICAL_MODULES: &[&str] = &["clinic_patient_flow", "clinic_intake_protocols"];
const COMMUNITY_WELLNESS_MODULES: &[&str] =
    &["wellness_facilitation", "unstoppable_curriculum"];
const COMMUNITY_HEALTH_OUTREACH_MODULES: &[&str] =
    &["outreach_engagement", "health_fair_operations"];

/// Training modules and label for one specialized program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRequirement {
    pub label: String,
    #[serde(default)]
    pub modules: BTreeSet<String>,
}

/// Tier definitions consumed by the eligibility engine.
///
/// Tier 1 is orientation, Tier 2 the baseline compliance training that gates
/// operational eligibility, and `programs` the Tier 3 sets keyed by program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCatalog {
    pub tier1: BTreeSet<String>,
    pub tier2: BTreeSet<String>,
    #[serde(default)]
    pub programs: BTreeMap<ProgramId, ProgramRequirement>,
}

impl TrainingCatalog {
    /// Built-in module sets shipped with the portal.
    pub fn standard() -> Self {
        let programs = [
            (ProgramId::StreetMedicine, STREET_MEDICINE_MODULES),
            (ProgramId::Clinical, CLINICAL_MODULES),
            (ProgramId::CommunityWellness, COMMUNITY_WELLNESS_MODULES),
            (
                ProgramId::CommunityHealthOutreach,
                COMMUNITY_HEALTH_OUTREACH_MODULES,
            ),
        ]
        .into_iter()
        .map(|(program, modules)| {
            (
                program,
                ProgramRequirement {
                    label: program.default_label().to_string(),
                    modules: module_set(modules),
                },
            )
        })
        .collect();

        Self {
            tier1: module_set(TIER1_MODULES),
            tier2: module_set(TIER2_MODULES),
            programs,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_reader(reader)?;
        if catalog.tier2.is_empty() {
            return Err(CatalogError::EmptyTier2);
        }
        Ok(catalog)
    }

    /// Modules required for `program`; a program missing from the catalog requires nothing.
    pub fn required_modules(&self, program: ProgramId) -> BTreeSet<String> {
        self.programs
            .get(&program)
            .map(|requirement| requirement.modules.clone())
            .unwrap_or_default()
    }

    pub fn program_label(&self, program: ProgramId) -> String {
        self.programs
            .get(&program)
            .map(|requirement| requirement.label.trim())
            .filter(|label| !label.is_empty())
            .unwrap_or(program.default_label())
            .to_string()
    }
}

impl Default for TrainingCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn module_set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Failures while loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read training catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("training catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("training catalog must define at least one tier2 module")]
    EmptyTier2,
}
