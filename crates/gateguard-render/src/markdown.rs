use crate::{RenderableReport, RenderableStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Gateguard posture report\n\n");
    let verdict = if report.overall_success { "PASS" } else { "FAIL" };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}`\n- Checks: {} passed, {} failed, {} warned, {} skipped\n\n",
        verdict, d.profile, d.pass, d.fail, d.warn, d.skip
    ));

    if report.results.is_empty() {
        out.push_str("No checks were run.\n");
        return out;
    }

    out.push_str("## Checks\n\n");

    for r in &report.results {
        match &r.detail {
            Some(detail) => out.push_str(&format!(
                "- [{}] `{}` {} ({})\n",
                r.status.tag(),
                r.check_id,
                r.label,
                detail
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` {}\n",
                r.status.tag(),
                r.check_id,
                r.label
            )),
        }
        if r.status == RenderableStatus::Fail {
            out.push_str(&format!(
                "  - run `gateguard explain {}` for remediation\n",
                r.check_id
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableData, RenderableResult};

    fn data() -> RenderableData {
        RenderableData {
            profile: "strict".to_string(),
            pass: 0,
            fail: 1,
            warn: 0,
            skip: 0,
        }
    }

    #[test]
    fn renders_empty_report() {
        let report = RenderableReport {
            overall_success: true,
            results: Vec::new(),
            data: RenderableData {
                fail: 0,
                ..data()
            },
        };
        let md = render_markdown(&report);
        assert!(md.contains("No checks were run"));
        assert!(md.contains("Verdict: **PASS**"));
    }

    #[test]
    fn failed_check_gets_an_explain_hint() {
        let report = RenderableReport {
            overall_success: false,
            results: vec![RenderableResult {
                status: RenderableStatus::Fail,
                check_id: "config.allow_list".to_string(),
                code: "empty_allow_list".to_string(),
                label: "sender allow-list populated".to_string(),
                detail: Some("channels.telegram.allowFrom is empty".to_string()),
            }],
            data: data(),
        };
        let md = render_markdown(&report);
        assert!(md.contains("Verdict: **FAIL**"));
        assert!(md.contains("[FAIL] `config.allow_list`"));
        assert!(md.contains("gateguard explain config.allow_list"));
    }
}
