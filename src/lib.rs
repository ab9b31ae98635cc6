//! rdv: resolution-dependent visualization.
//!
//! A chart is assembled from [`feature::Feature`]s, each switched on or off
//! by how many data points fall on each pixel of the drawing area. The
//! [`Vis`] orchestrator recomputes that density on every render pass and
//! drives each feature through its activate/deactivate callbacks.

pub mod chart;
pub mod core;
pub mod error;
pub mod feature;
pub mod render;
pub mod telemetry;
pub mod vis;

pub use error::{VisError, VisResult};
pub use feature::{Feature, FeatureConfig};
pub use vis::{Vis, VisConfig};
