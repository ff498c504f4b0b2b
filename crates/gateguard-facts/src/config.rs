//! Loads the gateway's JSON configuration document.

use camino::Utf8Path;
use gateguard_domain::model::{Fact, GatewayDoc};

/// Read and parse the gateway document. Any failure (missing file, bad
/// permissions, invalid JSON) yields an `Unavailable` fact so every
/// configuration check fails closed with the reason attached.
pub fn load_gateway_doc(path: &Utf8Path) -> Fact<GatewayDoc> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => return Fact::unavailable(format!("read {path}: {err}")),
    };
    parse_gateway_doc(&text)
}

/// Parse a gateway document from text (split out for tests).
pub fn parse_gateway_doc(text: &str) -> Fact<GatewayDoc> {
    match serde_json::from_str::<GatewayDoc>(text) {
        Ok(doc) => Fact::Available(doc),
        Err(err) => Fact::unavailable(format!("parse gateway config: {err}")),
    }
}
