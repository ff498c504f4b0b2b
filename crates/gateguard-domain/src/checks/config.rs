//! Configuration value checks over the gateway's JSON document.
//!
//! A missing or unreadable document fails each check closed, carrying the
//! unavailability reason as detail.

use crate::engine::{Catalog, Check};
use crate::model::{GatewayDoc, PostureModel};
use crate::policy::EffectiveConfig;
use gateguard_types::{Outcome, ids};
use serde_json::json;

pub fn register(cfg: &EffectiveConfig, catalog: &mut Catalog) {
    let entries: [(&'static str, &'static str, crate::engine::EvalFn); 8] = [
        (ids::CHECK_CONFIG_AUTH_MODE, "token auth enabled", eval_auth_mode),
        (ids::CHECK_CONFIG_TOKEN_STRENGTH, "auth token strength", eval_token_strength),
        (ids::CHECK_CONFIG_DM_POLICY, "DM policy is allowlist", eval_dm_policy),
        (ids::CHECK_CONFIG_ALLOW_LIST, "sender allow-list populated", eval_allow_list),
        (ids::CHECK_CONFIG_GROUP_POLICY, "group chats disabled", eval_group_policy),
        (ids::CHECK_CONFIG_FS_WORKSPACE_ONLY, "file tools workspace-only", eval_fs_workspace_only),
        (
            ids::CHECK_CONFIG_PATCH_WORKSPACE_ONLY,
            "patch application workspace-only",
            eval_patch_workspace_only,
        ),
        (ids::CHECK_CONFIG_LOG_REDACTION, "sensitive log redaction", eval_log_redaction),
    ];

    for (id, label, eval) in entries {
        if cfg.check_policy(id).is_some() {
            catalog.register(Check { id, label, eval });
        }
    }
}

/// Canonical wildcard predicate: an allow-list entry is a wildcard iff its
/// trimmed value is the single character `*`.
pub fn is_wildcard_entry(entry: &str) -> bool {
    entry.trim() == "*"
}

fn doc_or_fail(model: &PostureModel) -> Result<&GatewayDoc, Outcome> {
    match &model.config {
        crate::model::Fact::Available(doc) => Ok(doc),
        crate::model::Fact::Unavailable(reason) => {
            Err(Outcome::fail(ids::CODE_CONFIG_UNAVAILABLE, reason.clone()))
        }
    }
}

fn expect_string(
    field: &str,
    actual: Option<&str>,
    expected: &str,
) -> Outcome {
    match actual {
        None | Some("") => {
            Outcome::fail(ids::CODE_VALUE_MISSING, format!("{field} is not set"))
        }
        Some(v) if v == expected => Outcome::pass().with_data(json!({ field: v })),
        Some(v) => Outcome::fail(
            ids::CODE_VALUE_MISMATCH,
            format!("{field} is '{v}', expected '{expected}'"),
        ),
    }
}

fn eval_auth_mode(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    Ok(expect_string(
        "gateway.auth.mode",
        doc.gateway.auth.mode.as_deref(),
        &cfg.expect.auth_mode,
    ))
}

fn eval_token_strength(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    let min = cfg.expect.min_token_length;
    // The token value itself never reaches the report; only its length does.
    Ok(match doc.gateway.auth.token.as_deref() {
        None | Some("") => {
            Outcome::fail(ids::CODE_VALUE_MISSING, "gateway.auth.token is not set")
        }
        Some(token) if token.len() < min => Outcome::fail(
            ids::CODE_WEAK_TOKEN,
            format!("token is {} chars, expected at least {min}", token.len()),
        ),
        Some(token) => Outcome::pass().with_data(json!({ "tokenLength": token.len() })),
    })
}

fn eval_dm_policy(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    Ok(expect_string(
        "channels.telegram.dmPolicy",
        doc.channels.telegram.dm_policy.as_deref(),
        &cfg.expect.dm_policy,
    ))
}

/// Two conditions must both hold to pass: the list is non-empty, and no
/// entry is a wildcard.
fn eval_allow_list(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    let allow_from = &doc.channels.telegram.allow_from;
    Ok(if allow_from.is_empty() {
        Outcome::fail(
            ids::CODE_EMPTY_ALLOW_LIST,
            "channels.telegram.allowFrom is empty",
        )
    } else if allow_from.iter().any(|entry| is_wildcard_entry(entry)) {
        Outcome::fail(
            ids::CODE_WILDCARD_ENTRY,
            "channels.telegram.allowFrom contains a wildcard entry",
        )
    } else {
        Outcome::pass().with_data(json!({ "allowFromCount": allow_from.len() }))
    })
}

fn eval_group_policy(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    Ok(expect_string(
        "channels.telegram.groupPolicy",
        doc.channels.telegram.group_policy.as_deref(),
        &cfg.expect.group_policy,
    ))
}

fn expect_true(field: &str, actual: Option<bool>) -> Outcome {
    match actual {
        None => Outcome::fail(ids::CODE_VALUE_MISSING, format!("{field} is not set")),
        Some(false) => Outcome::fail(
            ids::CODE_VALUE_MISMATCH,
            format!("{field} is false, expected true"),
        ),
        Some(true) => Outcome::pass(),
    }
}

fn eval_fs_workspace_only(model: &PostureModel, _cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    Ok(expect_true(
        "tools.fs.workspaceOnly",
        doc.tools.fs.workspace_only,
    ))
}

fn eval_patch_workspace_only(
    model: &PostureModel,
    _cfg: &EffectiveConfig,
) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    Ok(expect_true(
        "tools.exec.applyPatch.workspaceOnly",
        doc.tools.exec.apply_patch.workspace_only,
    ))
}

fn eval_log_redaction(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    let doc = match doc_or_fail(model) {
        Ok(doc) => doc,
        Err(outcome) => return Ok(outcome),
    };
    let accepted = &cfg.expect.redact_sensitive;
    Ok(match doc.logging.redact_sensitive.as_deref() {
        None | Some("") => Outcome::fail(
            ids::CODE_VALUE_MISSING,
            "logging.redactSensitive is not set",
        ),
        Some(v) if accepted.iter().any(|a| a == v) => {
            Outcome::pass().with_data(json!({ "redactSensitive": v }))
        }
        Some(v) => Outcome::fail(
            ids::CODE_VALUE_MISMATCH,
            format!(
                "logging.redactSensitive is '{v}', expected one of [{}]",
                accepted.join(", ")
            ),
        ),
    })
}
