use crate::engine::Catalog;
use crate::policy::EffectiveConfig;

mod config;
mod fs;
mod runtime;

pub use config::is_wildcard_entry;

/// Build the standard catalog: filesystem, configuration, then runtime
/// checks, in the order they are reported.
pub fn default_catalog(cfg: &EffectiveConfig) -> Catalog {
    let mut catalog = Catalog::new();
    fs::register(cfg, &mut catalog);
    config::register(cfg, &mut catalog);
    runtime::register(cfg, &mut catalog);
    catalog
}
