//! Options controlling a single matching run.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::keys::KeyField;

/// Threshold used for every key when none is given.
pub const DEFAULT_THRESHOLD: u8 = 80;

const MAX_THRESHOLD: u8 = 100;

/// Minimum similarity score (0..=100) each key must reach for a row pair to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyThresholds {
    pub region: u8,
    pub zone: u8,
    pub woreda: u8,
}

impl Default for KeyThresholds {
    fn default() -> Self {
        Self {
            region: DEFAULT_THRESHOLD,
            zone: DEFAULT_THRESHOLD,
            woreda: DEFAULT_THRESHOLD,
        }
    }
}

impl KeyThresholds {
    pub fn new(region: u8, zone: u8, woreda: u8) -> Result<Self> {
        let thresholds = Self {
            region,
            zone,
            woreda,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Checks every threshold is within 0..=100.
    pub fn validate(&self) -> Result<()> {
        for key in KeyField::ALL {
            let value = self.get(key);
            if value > MAX_THRESHOLD {
                return Err(ModelError::InvalidThreshold {
                    key: key.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: KeyField) -> u8 {
        match key {
            KeyField::Region => self.region,
            KeyField::Zone => self.zone,
            KeyField::Woreda => self.woreda,
        }
    }

    pub fn set(&mut self, key: KeyField, value: u8) {
        match key {
            KeyField::Region => self.region = value,
            KeyField::Zone => self.zone = value,
            KeyField::Woreda => self.woreda = value,
        }
    }
}

/// How a row of table A picks among qualifying rows of table B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Take the first qualifying row in scan order.
    #[default]
    FirstFit,
    /// Take the qualifying row with the highest combined score; earlier rows win ties.
    BestFit,
}

/// Which key columns are trimmed and lower-cased before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyNormalization {
    /// Every key column.
    #[default]
    Always,
    /// Only key columns whose actual name differs from the canonical name.
    /// Canonically named columns are compared as written.
    RenamedOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub thresholds: KeyThresholds,
    pub strategy: MatchStrategy,
    pub normalization: KeyNormalization,
}

impl MatchOptions {
    pub fn new(thresholds: KeyThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: KeyNormalization) -> Self {
        self.normalization = normalization;
        self
    }
}
