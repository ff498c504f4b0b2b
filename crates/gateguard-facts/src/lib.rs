//! Fact-gathering adapters: build the posture model the engine evaluates.
//!
//! This crate is allowed to do filesystem IO and to spawn the container
//! tool. It never fails the run itself: a probe that cannot be completed
//! produces an `Unavailable` fact, and the corresponding checks decide what
//! that means (fail closed, warn, or skip).

#![forbid(unsafe_code)]

pub mod config;
pub mod docker;
pub mod fs;

use camino::Utf8Path;
use gateguard_domain::model::PostureModel;
use gateguard_settings::GatherPlan;

pub use docker::{DockerCli, ProbeError};

/// Gather every fact the enabled checks need.
///
/// `gather_runtime` is false when no runtime check is enabled (e.g. the
/// `config-only` profile); the container tool is then never spawned and the
/// runtime facts stay at their "not gathered" default.
pub fn build_posture_model(
    state_dir: &Utf8Path,
    plan: &GatherPlan,
    gather_runtime: bool,
) -> PostureModel {
    let mut model = PostureModel {
        fs: fs::build_fs_model(state_dir, plan),
        config: config::load_gateway_doc(&state_dir.join(&plan.config_file)),
        ..PostureModel::default()
    };

    model.runtime.sandbox.enabled = plan.sandbox_enabled;
    if gather_runtime {
        model.runtime = docker::build_runtime_model(plan);
    }

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn runtime_stays_ungathered_when_disabled() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");

        let model = build_posture_model(&root, &GatherPlan::default(), false);

        assert!(model.runtime.gateway.running.as_available().is_none());
        // The sandbox mode flag is still carried for skip semantics.
        assert!(model.runtime.sandbox.enabled);
    }
}
