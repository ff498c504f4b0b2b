//! Filesystem permission checks: exact match of permission bits per path
//! class, failing closed on missing paths.

use crate::engine::{Catalog, Check};
use crate::model::{PathProbe, PostureModel};
use crate::policy::EffectiveConfig;
use gateguard_types::{Outcome, ids};
use serde_json::json;

pub fn register(cfg: &EffectiveConfig, catalog: &mut Catalog) {
    if cfg.check_policy(ids::CHECK_FS_STATE_DIR_MODE).is_some() {
        catalog.register(Check {
            id: ids::CHECK_FS_STATE_DIR_MODE,
            label: "state directory permissions",
            eval: eval_state_dir,
        });
    }
    if cfg.check_policy(ids::CHECK_FS_CONFIG_FILE_MODE).is_some() {
        catalog.register(Check {
            id: ids::CHECK_FS_CONFIG_FILE_MODE,
            label: "gateway config file permissions",
            eval: eval_config_file,
        });
    }
    if cfg.check_policy(ids::CHECK_FS_WORKSPACE_DIR_MODE).is_some() {
        catalog.register(Check {
            id: ids::CHECK_FS_WORKSPACE_DIR_MODE,
            label: "workspace directory permissions",
            eval: eval_workspace_dir,
        });
    }
    if cfg.check_policy(ids::CHECK_FS_ENV_FILE_MODE).is_some() {
        catalog.register(Check {
            id: ids::CHECK_FS_ENV_FILE_MODE,
            label: "env file permissions",
            eval: eval_env_file,
        });
    }
}

fn eval_state_dir(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    Ok(mode_outcome(&model.fs.state_dir, cfg.expect.state_dir_mode))
}

fn eval_config_file(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    Ok(mode_outcome(&model.fs.config_file, cfg.expect.config_file_mode))
}

fn eval_workspace_dir(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    Ok(mode_outcome(&model.fs.workspace_dir, cfg.expect.workspace_dir_mode))
}

fn eval_env_file(model: &PostureModel, cfg: &EffectiveConfig) -> anyhow::Result<Outcome> {
    Ok(mode_outcome(&model.fs.env_file, cfg.expect.env_file_mode))
}

fn mode_outcome(probe: &PathProbe, expected: u32) -> Outcome {
    match probe.mode {
        None => Outcome::fail(ids::CODE_PATH_MISSING, format!("{} not found", probe.path))
            .with_data(json!({ "path": probe.path })),
        Some(actual) if actual == expected => Outcome::pass().with_data(json!({
            "path": probe.path,
            "mode": format!("{actual:o}"),
        })),
        Some(actual) => Outcome::fail(
            ids::CODE_MODE_MISMATCH,
            format!("got {actual:o}, expected {expected:o}"),
        )
        .with_data(json!({
            "path": probe.path,
            "mode": format!("{actual:o}"),
            "expected": format!("{expected:o}"),
        })),
    }
}
