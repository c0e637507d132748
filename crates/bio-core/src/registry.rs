use std::collections::HashSet;

use crate::error::{BioError, Result};
use crate::preset::Preset;

const BUILTIN_PRESETS: &str = include_str!("../assets/presets.json");

/// Fixed, ordered set of presets known at startup.
///
/// Built once and only read afterwards; registration order is the order in
/// which presets are listed and the first entry is the default.
#[derive(Clone, Debug)]
pub struct PresetRegistry {
    presets: Vec<Preset>,
}

impl PresetRegistry {
    pub fn new(presets: Vec<Preset>) -> Result<Self> {
        if presets.is_empty() {
            return Err(BioError::EmptyRegistry);
        }
        let mut seen = HashSet::new();
        for p in &presets {
            if !seen.insert(p.key.as_str()) {
                return Err(BioError::DuplicateKey { key: p.key.clone() });
            }
        }
        log::debug!("registered {} presets", presets.len());
        Ok(Self { presets })
    }

    /// Parses a JSON array of presets.
    pub fn from_json(json: &str) -> Result<Self> {
        let presets: Vec<Preset> = serde_json::from_str(json)?;
        Self::new(presets)
    }

    /// The presets shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PRESETS)
    }

    pub fn get(&self, key: &str) -> Result<&Preset> {
        self.position(key)
            .map(|i| &self.presets[i])
            .ok_or_else(|| BioError::NotFound { key: key.to_owned() })
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.key == key)
    }

    pub fn list_keys(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn default_preset(&self) -> &Preset {
        &self.presets[0]
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
