use serde::{Deserialize, Serialize};

/// Specialized programs that carry their own Tier 3 training requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramId {
    StreetMedicine,
    Clinical,
    CommunityWellness,
    CommunityHealthOutreach,
}

impl ProgramId {
    pub const ALL: [ProgramId; 4] = [
        ProgramId::StreetMedicine,
        ProgramId::Clinical,
        ProgramId::CommunityWellness,
        ProgramId::CommunityHealthOutreach,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ProgramId::StreetMedicine => "street_medicine",
            ProgramId::Clinical => "clinical",
            ProgramId::CommunityWellness => "community_wellness",
            ProgramId::CommunityHealthOutreach => "community_health_outreach",
        }
    }

    /// Display name used when the catalog does not supply a label.
    pub const fn default_label(self) -> &'static str {
        match self {
            ProgramId::StreetMedicine => "Street Medicine",
            ProgramId::Clinical => "Clinical",
            ProgramId::CommunityWellness => "Community Wellness",
            ProgramId::CommunityHealthOutreach => "Community Health Outreach",
        }
    }
}

// First match wins.
const CATEGORY_RULES: &[(ProgramId, &[&str])] = &[
    (ProgramId::StreetMedicine, &["street medicine", "smo"]),
    (ProgramId::Clinical, &["clinic", "clinical"]),
    (
        ProgramId::CommunityWellness,
        &["wellness", "unstoppable", "workshop"],
    ),
    (
        ProgramId::CommunityHealthOutreach,
        &["outreach", "health fair", "pop-up", "tabling"],
    ),
];

/// Infer the program an opportunity belongs to from its free-text category.
///
/// Matching is a case-insensitive substring test. Missing, empty, or unrecognized
/// categories are general events and return `None`.
pub fn classify(category: Option<&str>) -> Option<ProgramId> {
    let normalized = category.unwrap_or_default().to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| normalized.contains(*needle)))
        .map(|(program, _)| *program)
}
