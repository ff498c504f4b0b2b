//! Filesystem permission probes.

use camino::Utf8Path;
use gateguard_domain::model::{FsModel, PathProbe};
use gateguard_settings::GatherPlan;

/// Probe one path's permission bits. `mode` is `None` when the path is
/// missing or its metadata cannot be read; the corresponding check fails
/// closed on that.
pub fn probe_path(path: &Utf8Path) -> PathProbe {
    PathProbe {
        path: path.to_string(),
        mode: read_mode_bits(path),
    }
}

/// Probe the four verified path classes relative to the state directory.
pub fn build_fs_model(state_dir: &Utf8Path, plan: &GatherPlan) -> FsModel {
    FsModel {
        state_dir: probe_path(state_dir),
        config_file: probe_path(&state_dir.join(&plan.config_file)),
        workspace_dir: probe_path(&state_dir.join(&plan.workspace_dir)),
        env_file: probe_path(&state_dir.join(&plan.env_file)),
    }
}

#[cfg(unix)]
fn read_mode_bits(path: &Utf8Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(path).ok()?;
    Some(metadata.permissions().mode() & 0o7777)
}

/// Unix permission bits do not exist off-unix; every probe reports missing
/// and the permission checks fail closed.
#[cfg(not(unix))]
fn read_mode_bits(_path: &Utf8Path) -> Option<u32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    fn utf8_root(tmp: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn probe_reports_exact_permission_bits() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&tmp);
        let file = root.join("gateway.json");
        std::fs::write(&file, "{}").expect("write file");
        std::fs::set_permissions(&file, Permissions::from_mode(0o600)).expect("chmod");

        let probe = probe_path(&file);
        assert_eq!(probe.mode, Some(0o600));
        assert_eq!(probe.path, file.as_str());
    }

    #[test]
    fn probe_reports_missing_path_as_none() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&tmp);
        let probe = probe_path(&root.join("does-not-exist"));
        assert_eq!(probe.mode, None);
    }

    #[test]
    fn fs_model_probes_all_four_path_classes() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = utf8_root(&tmp);
        std::fs::set_permissions(&root, Permissions::from_mode(0o700)).expect("chmod root");
        std::fs::write(root.join("gateway.json"), "{}").expect("write config");
        std::fs::set_permissions(root.join("gateway.json"), Permissions::from_mode(0o600))
            .expect("chmod config");
        std::fs::create_dir(root.join("workspace")).expect("mkdir workspace");
        std::fs::set_permissions(root.join("workspace"), Permissions::from_mode(0o700))
            .expect("chmod workspace");

        let model = build_fs_model(&root, &GatherPlan::default());
        assert_eq!(model.state_dir.mode, Some(0o700));
        assert_eq!(model.config_file.mode, Some(0o600));
        assert_eq!(model.workspace_dir.mode, Some(0o700));
        // No .env file was created
        assert_eq!(model.env_file.mode, None);
    }
}
