use crate::RenderableReport;

/// The primary operator surface: one line per check with a fixed-width
/// status tag, then a one-line numeric summary.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    for r in &report.results {
        match &r.detail {
            Some(detail) => out.push_str(&format!("{} {}: {}\n", r.status.tag(), r.label, detail)),
            None => out.push_str(&format!("{} {}\n", r.status.tag(), r.label)),
        }
    }

    let d = &report.data;
    out.push_str(&format!(
        "\nsummary: {} passed, {} failed, {} warned ({} skipped)\n",
        d.pass, d.fail, d.warn, d.skip
    ));
    out.push_str(if report.overall_success {
        "posture check passed\n"
    } else {
        "posture check FAILED\n"
    });

    out
}
