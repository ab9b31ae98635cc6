use serde::{Deserialize, Serialize};

use crate::core::{Dimensionality, Margin};
use crate::error::{VisError, VisResult};

/// How a render pass treats features already in the selected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Invoke the selected callback for every feature on every pass.
    #[default]
    Always,
    /// Skip the callback when the feature's recorded state already matches
    /// the selection. The first pass always dispatches.
    SkipUnchanged,
}

/// Orchestrator construction options.
///
/// Serializable so host applications can persist chart setup.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisConfig {
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub dimensionality: Dimensionality,
    #[serde(default)]
    pub dispatch: DispatchPolicy,
}

impl VisConfig {
    #[must_use]
    pub fn new(margin: Margin, dimensionality: Dimensionality) -> Self {
        Self {
            margin,
            dimensionality,
            dispatch: DispatchPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_dimensionality(mut self, dimensionality: Dimensionality) -> Self {
        self.dimensionality = dimensionality;
        self
    }

    #[must_use]
    pub fn with_dispatch_policy(mut self, dispatch: DispatchPolicy) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn validate(&self) -> VisResult<()> {
        self.margin.validate()
    }

    pub fn to_json_pretty(&self) -> VisResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VisError::InvalidData(format!("failed to serialize vis config: {e}")))
    }

    pub fn from_json_str(input: &str) -> VisResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| VisError::InvalidData(format!("failed to parse vis config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
