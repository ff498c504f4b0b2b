use crate::checks;
use crate::model::PostureModel;
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::DomainReport;
use gateguard_types::{CheckResult, Outcome, StatusCounts, Verdict, ids};

/// Evaluation function for one check. Pure over the model; an `Err` is an
/// unexpected evaluation failure and gets downgraded to Fail by the run loop.
pub type EvalFn = fn(&PostureModel, &EffectiveConfig) -> anyhow::Result<Outcome>;

/// A named unit of verification.
#[derive(Clone, Copy, Debug)]
pub struct Check {
    pub id: &'static str,
    pub label: &'static str,
    pub eval: EvalFn,
}

/// Ordered check catalog. Registration order is evaluation and reporting
/// order. Duplicate IDs are permitted (and discouraged); no dedup happens.
#[derive(Debug, Default)]
pub struct Catalog {
    checks: Vec<Check>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }
}

/// Evaluate the standard catalog against a posture model.
pub fn evaluate(model: &PostureModel, cfg: &EffectiveConfig) -> DomainReport {
    let catalog = checks::default_catalog(cfg);
    run_catalog(&catalog, model, cfg)
}

/// Evaluate every registered check in order, collecting each outcome.
///
/// A check whose evaluation itself fails is caught and downgraded to a Fail
/// outcome carrying the error detail; the run never aborts because one
/// check's fact-gathering failed, so the report is complete even under
/// partial environmental unavailability.
pub fn run_catalog(catalog: &Catalog, model: &PostureModel, cfg: &EffectiveConfig) -> DomainReport {
    let mut results: Vec<CheckResult> = Vec::with_capacity(catalog.len());

    for check in catalog.iter() {
        let outcome = match (check.eval)(model, cfg) {
            Ok(outcome) => outcome,
            Err(err) => Outcome::fail(ids::CODE_CHECK_ERROR, format!("{err:#}")),
        };
        results.push(CheckResult::new(check.id, check.label, outcome));
    }

    let counts = StatusCounts::from_results(&results);
    let verdict = compute_verdict(&counts, cfg.fail_on);

    DomainReport {
        verdict,
        results,
        counts,
    }
}

fn compute_verdict(counts: &StatusCounts, fail_on: FailOn) -> Verdict {
    if counts.fail > 0 {
        return Verdict::Fail;
    }
    if counts.warn > 0 {
        return match fail_on {
            FailOn::Warn => Verdict::Fail,
            FailOn::Fail => Verdict::Warn,
        };
    }
    Verdict::Pass
}
