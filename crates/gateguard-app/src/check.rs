//! The `check` use case: gather facts, evaluate posture, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use gateguard_settings::{Overrides, ResolvedConfig};
use gateguard_types::{
    CheckResult, GateguardData, GateguardReport, Outcome, ReportEnvelope, SCHEMA_REPORT_V1,
    StatusCounts, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Gateway state directory (holds the config file, env file, workspace).
    pub state_dir: &'a Utf8Path,
    /// `gateguard.toml` contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: GateguardReport,
    /// The resolved configuration used.
    pub resolved: ResolvedConfig,
}

/// Run the check use case: resolve config, gather facts, evaluate the
/// catalog, wrap the result in the report envelope.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        gateguard_settings::GateguardConfigV1::default()
    } else {
        gateguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        gateguard_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    let gather_runtime = resolved.effective.runtime_checks_enabled();
    let model = gateguard_facts::build_posture_model(input.state_dir, &resolved.gather, gather_runtime);

    // A degraded runtime is worth surfacing in the summary, not just in the
    // individual fact_unavailable results.
    let runtime_note = if gather_runtime {
        model.runtime.gateway.running.reason().map(str::to_string)
    } else {
        None
    };

    let domain_report = gateguard_domain::evaluate(&model, &resolved.effective);
    let finished_at = OffsetDateTime::now_utc();

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "gateguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict: domain_report.verdict,
        results: domain_report.results,
        data: GateguardData {
            profile: resolved.effective.profile.clone(),
            state_dir: input.state_dir.to_string(),
            checks_run: domain_report.counts.total(),
            counts: domain_report.counts,
            runtime_note,
        },
    };

    Ok(CheckOutput { report, resolved })
}

/// Map verdict to exit code: 0 = pass/warn, 1 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 1,
    }
}

/// Degenerate report emitted when orchestration itself errors (not a check):
/// one failing `tool.runtime` result so downstream consumers still get a
/// well-formed envelope.
pub fn runtime_error_report(detail: &str) -> GateguardReport {
    let now = OffsetDateTime::now_utc();
    let results = vec![CheckResult::new(
        ids::CHECK_TOOL_RUNTIME,
        "verifier runtime",
        Outcome::fail(ids::CODE_RUNTIME_ERROR, detail),
    )];
    let counts = StatusCounts::from_results(&results);
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "gateguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        results,
        data: GateguardData {
            profile: String::new(),
            state_dir: String::new(),
            checks_run: counts.total(),
            counts,
            runtime_note: Some(detail.to_string()),
        },
    }
}
