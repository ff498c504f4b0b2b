//! Use case orchestration for gateguard.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, facts, domain, and render layers. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;

pub use check::{CheckInput, CheckOutput, run_check, runtime_error_report, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{
    parse_report_json, render_markdown, render_text, serialize_report, to_renderable, write_report,
    write_text,
};
