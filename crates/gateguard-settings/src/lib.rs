//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration
//! provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{CheckConfig, GatewayExpectConfig, GateguardConfigV1, PathsConfig, RuntimeConfig};
pub use resolve::{GatherPlan, Overrides, ResolvedConfig};

/// Parse `gateguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<GateguardConfigV1> {
    let cfg: GateguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profiles + overrides +
/// per-check config) and the gathering plan used by the facts layer.
pub fn resolve_config(
    cfg: GateguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
