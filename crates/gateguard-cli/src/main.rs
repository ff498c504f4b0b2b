//! CLI entry point for gateguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. All business logic lives in the `gateguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use gateguard_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, parse_report_json,
    render_markdown, render_text, run_check, run_explain, runtime_error_report, to_renderable,
    verdict_exit_code, write_report, write_text,
};
use gateguard_settings::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "gateguard",
    version,
    about = "Security posture verifier for self-hosted gateway deployments"
)]
struct Cli {
    /// Gateway state directory (holds the gateway config, env file, and workspace).
    #[arg(long, default_value = "~/.gateway")]
    state_dir: Utf8PathBuf,

    /// Path to gateguard config TOML (relative paths resolve inside the state dir).
    #[arg(long, default_value = "gateguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|config-only).
    #[arg(long)]
    profile: Option<String>,

    /// Override when the run fails (fail|warn).
    #[arg(long)]
    fail_on: Option<String>,

    /// Treat the deployment as having no sandbox service.
    #[arg(long)]
    no_sandbox: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the posture checklist and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/gateguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/gateguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/gateguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "runtime.loopback_bind") or code (e.g.,
        /// "wildcard_entry") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, report_out.clone(), write_markdown, markdown_out.clone()),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

fn cmd_check(
    cli: &Cli,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    let state_dir = expand_tilde(&cli.state_dir);

    let result = (|| -> anyhow::Result<i32> {
        // Load config if present; a missing file is allowed (defaults apply).
        let cfg_path = if cli.config.is_absolute() {
            cli.config.clone()
        } else {
            state_dir.join(&cli.config)
        };
        let cfg_text = std::fs::read_to_string(&cfg_path).unwrap_or_default();

        let overrides = Overrides {
            profile: cli.profile.clone(),
            fail_on: cli.fail_on.clone(),
            sandbox_enabled: cli.no_sandbox.then_some(false),
        };

        let input = CheckInput {
            state_dir: &state_dir,
            config_text: &cfg_text,
            overrides,
        };

        let output = run_check(input)?;

        let renderable = to_renderable(&output.report);
        print!("{}", render_text(&renderable));

        write_report(&report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&renderable);
            write_text(&markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report(&report_out, &report);
            eprintln!("gateguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_md(report: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&report).with_context(|| format!("read {report}"))?;
    let parsed = parse_report_json(&text)?;
    let md = render_markdown(&to_renderable(&parsed));

    match output {
        Some(path) => write_text(&path, &md).context("write markdown")?,
        None => print!("{md}"),
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

/// Expand a leading `~/` against `$HOME`; paths without it pass through.
fn expand_tilde(path: &Utf8Path) -> Utf8PathBuf {
    let Some(rest) = path.as_str().strip_prefix("~/") else {
        return path.to_owned();
    };
    match std::env::var("HOME") {
        Ok(home) => Utf8PathBuf::from(home).join(rest),
        Err(_) => path.to_owned(),
    }
}
