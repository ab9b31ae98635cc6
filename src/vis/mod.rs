//! Density-dispatch orchestrator.
//!
//! `Vis` owns the dataset, the measured viewport and the margin. A render
//! pass computes the density once and drives every registered feature
//! through its activate/deactivate callback in registration order.

mod config;
mod context;
mod events;

pub use config::{DispatchPolicy, VisConfig};
pub use context::VisContext;
pub use events::{SubscriptionId, VisEvent, VisEventKind};

use tracing::{debug, trace, warn};

use crate::core::{Dimensionality, Margin, Viewport, compute_density};
use crate::error::{VisError, VisResult};
use crate::feature::{Feature, FeatureState, Transition};
use crate::render::{RenderTarget, Scene};

use events::EventDispatcher;

/// Outcome for one feature within a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTransition {
    pub id: String,
    pub transition: Transition,
    /// `false` when [`DispatchPolicy::SkipUnchanged`] elided the callback.
    pub dispatched: bool,
}

/// Summary of one render pass.
///
/// `density` may be `+inf` or `NaN` on degenerate geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub density: f64,
    pub transitions: Vec<FeatureTransition>,
}

impl RenderPass {
    pub fn active_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.transitions
            .iter()
            .filter(|entry| entry.transition == Transition::Activate)
            .map(|entry| entry.id.as_str())
    }

    #[must_use]
    pub fn dispatched_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|entry| entry.dispatched)
            .count()
    }
}

struct FeatureSlot<T, S: RenderTarget> {
    feature: Box<dyn Feature<T, S>>,
    /// `None` until the first dispatch, and again after a failed callback.
    state: Option<FeatureState>,
}

/// The density-dispatch orchestrator.
pub struct Vis<T, S: RenderTarget = Scene> {
    config: VisConfig,
    target: Option<S>,
    data: Vec<T>,
    viewport: Viewport,
    features: Vec<FeatureSlot<T, S>>,
    events: EventDispatcher<T>,
}

impl<T, S: RenderTarget> Vis<T, S> {
    /// Builds an orchestrator with a fixed margin and dimensionality and an
    /// ordered feature list. Feature ids must be unique.
    pub fn new(config: VisConfig, features: Vec<Box<dyn Feature<T, S>>>) -> VisResult<Self> {
        config.validate()?;
        let mut vis = Self {
            config,
            target: None,
            data: Vec::new(),
            viewport: Viewport::default(),
            features: Vec::with_capacity(features.len()),
            events: EventDispatcher::default(),
        };
        for feature in features {
            vis.register_feature(feature)?;
        }
        Ok(vis)
    }

    /// Appends a feature; it renders after (and over) every earlier one.
    pub fn register_feature(&mut self, feature: Box<dyn Feature<T, S>>) -> VisResult<()> {
        if self.has_feature(feature.id()) {
            return Err(VisError::DuplicateFeature(feature.id().to_owned()));
        }
        debug!(
            feature = feature.id(),
            low = feature.range().low(),
            high = feature.range().high(),
            "register feature"
        );
        self.features.push(FeatureSlot {
            feature,
            state: None,
        });
        Ok(())
    }

    #[must_use]
    pub fn has_feature(&self, id: &str) -> bool {
        self.features.iter().any(|slot| slot.feature.id() == id)
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn feature_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().map(|slot| slot.feature.id())
    }

    /// State recorded by the most recent dispatch of feature `id`.
    #[must_use]
    pub fn feature_state(&self, id: &str) -> Option<FeatureState> {
        self.features
            .iter()
            .find(|slot| slot.feature.id() == id)
            .map(|slot| slot.state.unwrap_or_default())
    }

    pub fn active_features(&self) -> impl Iterator<Item = &str> + '_ {
        self.features
            .iter()
            .filter(|slot| slot.state == Some(FeatureState::Active))
            .map(|slot| slot.feature.id())
    }

    /// Associates a render target; returns the previously bound one.
    /// Does not render.
    pub fn bind(&mut self, target: S) -> Option<S> {
        debug!(rebind = self.target.is_some(), "bind render target");
        self.target.replace(target)
    }

    pub fn unbind(&mut self) -> Option<S> {
        self.target.take()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn target(&self) -> Option<&S> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut S> {
        self.target.as_mut()
    }

    /// Replaces the dataset and notifies `Data` subscribers before returning.
    /// Does not render.
    pub fn set_data(&mut self, records: Vec<T>) {
        debug!(
            previous_count = self.data.len(),
            count = records.len(),
            "set data"
        );
        self.data = records;
        let context = VisContext::new(
            &self.data,
            self.viewport,
            self.config.margin,
            self.config.dimensionality,
        );
        self.events.emit(&VisEvent::Data(&self.data), &context);
    }

    /// Re-measures the bound target, stores the new viewport and notifies
    /// `Resize` subscribers before returning. Does not render.
    pub fn resize(&mut self) -> VisResult<Viewport> {
        let target = self
            .target
            .as_ref()
            .ok_or(VisError::Unbound {
                operation: "resize",
            })?;
        let viewport = target.measure();
        debug!(
            width = viewport.width,
            height = viewport.height,
            "resize viewport"
        );
        self.viewport = viewport;
        let context = VisContext::new(
            &self.data,
            self.viewport,
            self.config.margin,
            self.config.dimensionality,
        );
        self.events.emit(
            &VisEvent::Resize {
                width: viewport.width,
                height: viewport.height,
            },
            &context,
        );
        Ok(viewport)
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.viewport.height
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.config.margin
    }

    #[must_use]
    pub fn dimensionality(&self) -> Dimensionality {
        self.config.dimensionality
    }

    #[must_use]
    pub fn config(&self) -> VisConfig {
        self.config
    }

    /// Data points per pixel for the current dataset and viewport.
    #[must_use]
    pub fn density(&self) -> f64 {
        compute_density(
            self.data.len(),
            self.viewport,
            self.config.margin,
            self.config.dimensionality,
        )
    }

    #[must_use]
    pub fn context(&self) -> VisContext<'_, T> {
        VisContext::new(
            &self.data,
            self.viewport,
            self.config.margin,
            self.config.dimensionality,
        )
    }

    /// Subscribes `handler` to `kind`. Handlers run synchronously, in
    /// subscription order, before the triggering call returns.
    pub fn on<F>(&mut self, kind: VisEventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&VisEvent<'_, T>, &VisContext<'_, T>) + 'static,
    {
        self.events.subscribe(kind, Box::new(handler))
    }

    pub fn on_data<F>(&mut self, mut handler: F) -> SubscriptionId
    where
        F: FnMut(&[T]) + 'static,
    {
        self.on(VisEventKind::Data, move |event, _| {
            if let VisEvent::Data(records) = *event {
                handler(records);
            }
        })
    }

    pub fn on_resize<F>(&mut self, mut handler: F) -> SubscriptionId
    where
        F: FnMut(f64, f64) + 'static,
    {
        self.on(VisEventKind::Resize, move |event, _| {
            if let VisEvent::Resize { width, height } = *event {
                handler(width, height);
            }
        })
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    #[must_use]
    pub fn subscriber_count(&self, kind: VisEventKind) -> usize {
        self.events.count(kind)
    }

    /// Runs one render pass.
    ///
    /// Density is computed once; then each feature, in registration order,
    /// gets the callback its range selects. A failing callback aborts the
    /// pass and its error is returned unchanged; features after it are not
    /// visited.
    pub fn render(&mut self) -> VisResult<RenderPass> {
        let Self {
            config,
            target,
            data,
            viewport,
            features,
            ..
        } = self;
        let target = target.as_mut().ok_or(VisError::Unbound {
            operation: "render",
        })?;
        let context = VisContext::new(
            data.as_slice(),
            *viewport,
            config.margin,
            config.dimensionality,
        );
        let density = context.density();
        if !density.is_finite() {
            warn!(density, "rendering with non-finite density");
        }
        debug!(
            density,
            records = data.len(),
            feature_count = features.len(),
            "render pass"
        );

        let mut transitions = Vec::with_capacity(features.len());
        for slot in features.iter_mut() {
            let transition = slot.feature.select(density);
            let next_state = transition.resulting_state();
            let id = slot.feature.id().to_owned();

            if config.dispatch == DispatchPolicy::SkipUnchanged && slot.state == Some(next_state)
            {
                trace!(feature = %id, ?transition, "feature unchanged, skipping");
                transitions.push(FeatureTransition {
                    id,
                    transition,
                    dispatched: false,
                });
                continue;
            }

            trace!(feature = %id, ?transition, "dispatch feature");
            let outcome = match transition {
                Transition::Activate => slot.feature.activate(target, &context),
                Transition::Deactivate => slot.feature.deactivate(target, &context),
            };
            if let Err(err) = outcome {
                slot.state = None;
                return Err(err);
            }
            slot.state = Some(next_state);
            transitions.push(FeatureTransition {
                id,
                transition,
                dispatched: true,
            });
        }

        Ok(RenderPass {
            density,
            transitions,
        })
    }
}
