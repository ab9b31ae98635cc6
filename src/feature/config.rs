use crate::core::DensityRange;
use crate::error::VisResult;
use crate::feature::Feature;
use crate::render::RenderTarget;
use crate::vis::VisContext;

type Callback<T, S, P> = Box<dyn FnMut(&mut P, &mut S, &VisContext<'_, T>) -> VisResult<()>>;

/// Feature declared from closures instead of a dedicated type.
///
/// `P` is feature-private state handed to both callbacks, e.g. a retained
/// handle to the region the feature draws into. The orchestrator never
/// looks at it.
///
/// ```
/// use rdv::core::DensityRange;
/// use rdv::feature::FeatureConfig;
/// use rdv::render::{RenderTarget, Scene};
///
/// let feature = FeatureConfig::<u32, Scene>::new("grid")
///     .with_range(DensityRange::new(0.0, 1e-3).expect("valid range"))
///     .on_activate(|_, scene: &mut Scene, _| {
///         scene.ensure_region("grid");
///         Ok(())
///     })
///     .on_deactivate(|_, scene: &mut Scene, _| {
///         scene.remove_region("grid");
///         Ok(())
///     });
/// # let _ = feature;
/// ```
pub struct FeatureConfig<T, S, P = ()> {
    id: String,
    range: DensityRange,
    state: P,
    activate: Option<Callback<T, S, P>>,
    deactivate: Option<Callback<T, S, P>>,
}

impl<T, S> FeatureConfig<T, S, ()> {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_state(id, ())
    }
}

impl<T, S, P> FeatureConfig<T, S, P> {
    #[must_use]
    pub fn with_state(id: impl Into<String>, state: P) -> Self {
        Self {
            id: id.into(),
            range: DensityRange::ALWAYS,
            state,
            activate: None,
            deactivate: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: DensityRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn on_activate<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut P, &mut S, &VisContext<'_, T>) -> VisResult<()> + 'static,
    {
        self.activate = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_deactivate<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut P, &mut S, &VisContext<'_, T>) -> VisResult<()> + 'static,
    {
        self.deactivate = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn state(&self) -> &P {
        &self.state
    }
}

impl<T, S: RenderTarget, P> Feature<T, S> for FeatureConfig<T, S, P> {
    fn id(&self) -> &str {
        &self.id
    }

    fn range(&self) -> DensityRange {
        self.range
    }

    fn activate(&mut self, target: &mut S, vis: &VisContext<'_, T>) -> VisResult<()> {
        match self.activate.as_mut() {
            Some(callback) => callback(&mut self.state, target, vis),
            None => Ok(()),
        }
    }

    fn deactivate(&mut self, target: &mut S, vis: &VisContext<'_, T>) -> VisResult<()> {
        match self.deactivate.as_mut() {
            Some(callback) => callback(&mut self.state, target, vis),
            None => Ok(()),
        }
    }
}

impl<T, S, P: std::fmt::Debug> std::fmt::Debug for FeatureConfig<T, S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureConfig")
            .field("id", &self.id)
            .field("range", &self.range)
            .field("state", &self.state)
            .field("activate", &self.activate.is_some())
            .field("deactivate", &self.deactivate.is_some())
            .finish()
    }
}
