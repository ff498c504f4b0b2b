use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for gateguard reports.
pub const SCHEMA_REPORT_V1: &str = "gateguard.report.v1";

/// Status of one evaluated check.
///
/// `Warn` and `Skip` never affect the overall verdict's pass/fail split; only
/// `Fail` does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Warn,
    Skip,
}

/// The result of evaluating a single check, before it is bound to a check ID.
///
/// `code` discriminates *why* a check resolved the way it did (e.g.
/// `mode_mismatch` vs `path_missing` for the same filesystem check).
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub status: Status,
    pub code: String,
    pub detail: Option<String>,
    pub data: JsonValue,
}

impl Outcome {
    pub fn pass() -> Self {
        Self {
            status: Status::Pass,
            code: crate::ids::CODE_OK.to_string(),
            detail: None,
            data: JsonValue::Null,
        }
    }

    pub fn fail(code: &str, detail: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            code: code.to_string(),
            detail: Some(detail.into()),
            data: JsonValue::Null,
        }
    }

    pub fn warn(code: &str, detail: impl Into<String>) -> Self {
        Self {
            status: Status::Warn,
            code: code.to_string(),
            detail: Some(detail.into()),
            data: JsonValue::Null,
        }
    }

    pub fn skip(code: &str, detail: impl Into<String>) -> Self {
        Self {
            status: Status::Skip,
            code: code.to_string(),
            detail: Some(detail.into()),
            data: JsonValue::Null,
        }
    }

    /// Attach a check-specific structured payload.
    #[must_use]
    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }
}

/// One line of the report: a check bound to its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub status: Status,
    pub check_id: String,
    pub code: String,
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

impl CheckResult {
    pub fn new(check_id: &str, label: &str, outcome: Outcome) -> Self {
        Self {
            status: outcome.status,
            check_id: check_id.to_string(),
            code: outcome.code,
            label: label.to_string(),
            detail: outcome.detail,
            data: outcome.data,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusCounts {
    pub pass: u32,
    pub fail: u32,
    pub warn: u32,
    pub skip: u32,
}

impl StatusCounts {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut counts = StatusCounts::default();
        for r in results {
            match r.status {
                Status::Pass => counts.pass += 1,
                Status::Fail => counts.fail += 1,
                Status::Warn => counts.warn += 1,
                Status::Skip => counts.skip += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.pass + self.fail + self.warn + self.skip
    }
}

/// Gateguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct GateguardData {
    pub profile: String,
    pub state_dir: String,

    pub checks_run: u32,
    pub counts: StatusCounts,

    /// Set when runtime facts could not be gathered at all (e.g. the container
    /// tool is absent), so readers can tell degraded runs from clean ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_note: Option<String>,
}

/// A generic report envelope.
///
/// Keeping this generic allows gateguard to embed tool-specific data while still
/// enforcing a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = GateguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    /// Every evaluated check, in evaluation order. Unlike a finding stream,
    /// passing checks are listed too.
    pub results: Vec<CheckResult>,
    pub data: TData,
}

pub type GateguardReport = ReportEnvelope<GateguardData>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partition_results() {
        let results = vec![
            CheckResult::new("a.one", "one", Outcome::pass()),
            CheckResult::new("a.two", "two", Outcome::fail("value_mismatch", "bad")),
            CheckResult::new("a.three", "three", Outcome::warn("runtime_unavailable", "no tool")),
            CheckResult::new("a.four", "four", Outcome::skip("sandbox_disabled", "off")),
            CheckResult::new("a.five", "five", Outcome::pass()),
        ];
        let counts = StatusCounts::from_results(&results);
        assert_eq!(counts.pass, 2);
        assert_eq!(counts.fail, 1);
        assert_eq!(counts.warn, 1);
        assert_eq!(counts.skip, 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn outcome_constructors_set_codes() {
        assert_eq!(Outcome::pass().code, "ok");
        let f = Outcome::fail("mode_mismatch", "got 644, expected 600");
        assert_eq!(f.status, Status::Fail);
        assert_eq!(f.detail.as_deref(), Some("got 644, expected 600"));
    }

    #[test]
    fn check_result_serializes_without_null_fields() {
        let r = CheckResult::new("fs.state_dir_mode", "state directory permissions", Outcome::pass());
        let json = serde_json::to_string(&r).expect("serialize");
        assert!(!json.contains("detail"));
        assert!(!json.contains("\"data\""));
    }
}
