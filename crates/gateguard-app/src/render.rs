//! Render use cases: text checklist and Markdown from in-memory reports,
//! plus report (de)serialization and artifact writing.

use anyhow::Context;
use camino::Utf8Path;
use gateguard_render::{RenderableData, RenderableReport, RenderableResult, RenderableStatus};
use gateguard_types::{GateguardReport, Status};

pub fn render_text(report: &RenderableReport) -> String {
    gateguard_render::render_text(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    gateguard_render::render_markdown(report)
}

pub fn to_renderable(report: &GateguardReport) -> RenderableReport {
    RenderableReport {
        overall_success: report.data.counts.fail == 0,
        results: report
            .results
            .iter()
            .map(|r| RenderableResult {
                status: match r.status {
                    Status::Pass => RenderableStatus::Pass,
                    Status::Fail => RenderableStatus::Fail,
                    Status::Warn => RenderableStatus::Warn,
                    Status::Skip => RenderableStatus::Skip,
                },
                check_id: r.check_id.clone(),
                code: r.code.clone(),
                label: r.label.clone(),
                detail: r.detail.clone(),
            })
            .collect(),
        data: RenderableData {
            profile: report.data.profile.clone(),
            pass: report.data.counts.pass,
            fail: report.data.counts.fail,
            warn: report.data.counts.warn,
            skip: report.data.counts.skip,
        },
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<GateguardReport> {
    serde_json::from_str(text).context("parse report json")
}

pub fn serialize_report(report: &GateguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn write_report(path: &Utf8Path, report: &GateguardReport) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}
