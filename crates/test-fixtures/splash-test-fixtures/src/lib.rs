//! Named loading-sequence configs shared by the workspace tests.
//!
//! `fixtures/manifest.json` maps a name to a JSON file under `fixtures/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    sequences: BTreeMap<String, String>,
}

impl Manifest {
    fn sequence_path(&self, name: &str) -> Result<PathBuf> {
        let rel = self
            .sequences
            .get(name)
            .ok_or_else(|| anyhow!("unknown sequence fixture '{name}'"))?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }
}

pub mod sequences {
    use super::*;

    /// Fixture names in sorted order.
    pub fn keys() -> Vec<String> {
        MANIFEST.sequences.keys().cloned().collect()
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        MANIFEST.sequence_path(name)
    }

    /// Raw JSON text of a fixture.
    pub fn json(name: &str) -> Result<String> {
        let path = path(name)?;
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read sequence fixture {}", path.display()))
    }

    /// Deserialize a fixture. Validation is left to the caller, so fixtures
    /// may hold configs that are meant to be rejected.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse sequence fixture '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sequence_fixture_is_json() {
        let keys = sequences::keys();
        assert!(keys.contains(&"default".to_string()));
        for key in keys {
            let value: serde_json::Value = sequences::load(&key).unwrap();
            assert!(value.is_object(), "{key} should be a JSON object");
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = sequences::json("nope").unwrap_err();
        assert!(err.to_string().contains("unknown sequence fixture 'nope'"));
    }
}
