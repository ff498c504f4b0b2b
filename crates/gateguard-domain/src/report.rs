use gateguard_types::{CheckResult, StatusCounts, Verdict};

/// Engine output, before it is wrapped in the report envelope.
#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub results: Vec<CheckResult>,
    pub counts: StatusCounts,
}

impl DomainReport {
    /// True iff no check resolved to Fail. Warn and Skip do not affect this.
    pub fn overall_success(&self) -> bool {
        self.counts.fail == 0
    }
}
