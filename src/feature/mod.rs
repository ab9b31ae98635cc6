//! Toggleable visual capabilities bound to a density range.
//!
//! A feature never decides on its own when to draw. On every render pass
//! the orchestrator asks it to [`select`](Feature::select) a transition for
//! the current density and then invokes the matching callback. Both callbacks
//! must be idempotent: repeated `activate` calls converge on the same drawn
//! state and `deactivate` on an inactive feature is a no-op.

mod config;

pub use config::FeatureConfig;

use serde::{Deserialize, Serialize};

use crate::core::DensityRange;
use crate::error::VisResult;
use crate::render::RenderTarget;
use crate::vis::VisContext;

/// Callback chosen for a feature on one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Activate,
    Deactivate,
}

impl Transition {
    /// State the feature is in once the callback has run.
    #[must_use]
    pub fn resulting_state(self) -> FeatureState {
        match self {
            Self::Activate => FeatureState::Active,
            Self::Deactivate => FeatureState::Inactive,
        }
    }
}

/// Per-feature lifecycle state. A feature that has never been activated
/// reports `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureState {
    #[default]
    Inactive,
    Active,
}

/// A named visual capability with an applicability range over the density
/// metric and two lifecycle callbacks.
///
/// Every method but [`id`](Feature::id) has a default: the range applies to
/// every density and both callbacks do nothing, so a feature may implement
/// only the side it needs.
pub trait Feature<T, S: RenderTarget> {
    /// Stable identifier, unique within one orchestrator.
    fn id(&self) -> &str;

    fn range(&self) -> DensityRange {
        DensityRange::ALWAYS
    }

    fn activate(&mut self, _target: &mut S, _vis: &VisContext<'_, T>) -> VisResult<()> {
        Ok(())
    }

    fn deactivate(&mut self, _target: &mut S, _vis: &VisContext<'_, T>) -> VisResult<()> {
        Ok(())
    }

    fn applies(&self, density: f64) -> bool {
        self.range().contains(density)
    }

    /// The sole dispatch rule: no hysteresis, no partial states.
    fn select(&self, density: f64) -> Transition {
        if self.applies(density) {
            Transition::Activate
        } else {
            Transition::Deactivate
        }
    }
}
