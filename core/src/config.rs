use serde::{Deserialize, Serialize};

/// Row limits for the ranking queries. Completeness queries are never truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingLimits {
    pub top_receivers: usize,
    pub claims_per_food: usize,
    pub top_providers: usize,
    pub avg_quantity_per_receiver: usize,
    pub donated_by_provider: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            top_receivers: 20,
            claims_per_food: 30,
            top_providers: 20,
            avg_quantity_per_receiver: 20,
            donated_by_provider: 30,
        }
    }
}

impl RankingLimits {
    /// No truncation at all; every ranking returns its full ordering.
    pub fn unlimited() -> Self {
        Self {
            top_receivers: usize::MAX,
            claims_per_food: usize::MAX,
            top_providers: usize::MAX,
            avg_quantity_per_receiver: usize::MAX,
            donated_by_provider: usize::MAX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub ranking: RankingLimits,
}

impl EngineConfig {
    /// Load from a JSON file. Fields left out fall back to the defaults.
    /// In tests, use `EngineConfig::default()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid engine config {path}: {e}"))?;
        Ok(config)
    }
}
