use serde::{Deserialize, Serialize};

const ELIGIBLE_MESSAGE: &str = "You are eligible to register for this shift.";
const FALLBACK_MESSAGE: &str = "Unable to register for this shift.";

/// Gate that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Orientation,
    BaselineTraining,
    RoleApproval,
    ProgramClearance,
    BackgroundCheck,
    WeeklyAvailability,
    TimeOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Blocking,
    Warning,
}

/// One problem reported by a gate, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateFinding {
    pub gate: GateKind,
    pub severity: FindingSeverity,
    pub message: String,
}

impl GateFinding {
    pub(crate) fn blocking(gate: GateKind, message: String) -> Self {
        Self {
            gate,
            severity: FindingSeverity::Blocking,
            message,
        }
    }

    pub(crate) fn warning(gate: GateKind, message: String) -> Self {
        Self {
            gate,
            severity: FindingSeverity::Warning,
            message,
        }
    }
}

/// Pass/fail state of each gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityGates {
    pub is_operational_eligible: bool,
    pub tier1_complete: bool,
    pub tier2_complete: bool,
    pub program_clearance: bool,
    pub background_check_complete: bool,
}

/// Outcome of evaluating a volunteer against an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDecision {
    pub can_register: bool,
    pub blocking_issues: Vec<String>,
    pub warnings: Vec<String>,
    pub gates: EligibilityGates,
    pub findings: Vec<GateFinding>,
}

impl RegistrationDecision {
    pub(crate) fn from_findings(gates: EligibilityGates, findings: Vec<GateFinding>) -> Self {
        let messages = |severity: FindingSeverity| -> Vec<String> {
            findings
                .iter()
                .filter(|finding| finding.severity == severity)
                .map(|finding| finding.message.clone())
                .collect()
        };
        let blocking_issues = messages(FindingSeverity::Blocking);
        let warnings = messages(FindingSeverity::Warning);

        // Both conditions are kept: a gate may flip eligibility without adding a message.
        let can_register = blocking_issues.is_empty() && gates.is_operational_eligible;

        Self {
            can_register,
            blocking_issues,
            warnings,
            gates,
            findings,
        }
    }

    pub fn blocked_by(&self, gate: GateKind) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.gate == gate && finding.severity == FindingSeverity::Blocking)
    }

    /// Messages (blocking or warning) raised by the listed gates, in evaluation order.
    pub fn messages_for(&self, gates: &[GateKind]) -> Vec<String> {
        self.findings
            .iter()
            .filter(|finding| gates.contains(&finding.gate))
            .map(|finding| finding.message.clone())
            .collect()
    }

    /// Flatten the decision into the text shown to the volunteer.
    pub fn summary(&self) -> String {
        if self.can_register {
            return ELIGIBLE_MESSAGE.to_string();
        }

        if self.blocking_issues.is_empty() {
            return FALLBACK_MESSAGE.to_string();
        }

        let count = self.blocking_issues.len();
        let noun = if count == 1 { "issue" } else { "issues" };
        let mut message = format!(
            "{count} {noun} preventing registration:\n\n{}",
            self.blocking_issues.join("\n\n")
        );

        if !self.warnings.is_empty() {
            message.push_str("\n\nWarnings:\n");
            message.push_str(&self.warnings.join("\n"));
        }

        message
    }
}
