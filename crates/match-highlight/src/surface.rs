//! Per-surface facade: owns configuration, caches, schedulers and the current decoration sets.

use crate::classifier::classify;
use crate::config::HighlightConfig;
use crate::decoration::DecorationSet;
use crate::flatten::FlattenCache;
use crate::scheduler::{RecomputeScheduler, SchedulerState, Trigger};
use crate::selection::highlight_selection;
use crate::view::HighlightView;
use std::sync::Arc;
use std::time::Instant;

/// What changed on the host surface since the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceUpdate {
    /// The document text changed.
    pub document_changed: bool,
    /// The visible ranges changed.
    pub viewport_changed: bool,
    /// The selection changed.
    pub selection_changed: bool,
}

impl SurfaceUpdate {
    /// A document edit.
    pub fn document() -> Self {
        Self {
            document_changed: true,
            ..Self::default()
        }
    }

    /// A scroll or resize.
    pub fn viewport() -> Self {
        Self {
            viewport_changed: true,
            ..Self::default()
        }
    }

    /// A selection move.
    pub fn selection() -> Self {
        Self {
            selection_changed: true,
            ..Self::default()
        }
    }

    /// Triggers carried by this update, most significant first.
    pub fn triggers(&self) -> impl Iterator<Item = Trigger> {
        [
            (self.document_changed, Trigger::DocumentChanged),
            (self.viewport_changed, Trigger::ViewportChanged),
            (self.selection_changed, Trigger::SelectionChanged),
        ]
        .into_iter()
        .filter_map(|(set, trigger)| set.then_some(trigger))
    }
}

/// Opaque reconfiguration token, produced by [`reconfigure`] and applied with
/// [`HighlightSurface::apply_effect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconfigureEffect {
    config: HighlightConfig,
}

/// Wrap a new configuration into an effect a live surface can apply.
pub fn reconfigure(config: HighlightConfig) -> ReconfigureEffect {
    ReconfigureEffect { config }
}

/// Renderer-facing access to decorations.
pub trait DecorationProvider {
    /// Current decoration sets, bottom first.
    fn decoration_sets(&self) -> Vec<Arc<DecorationSet>>;
}

/// Highlighting state of one live editor surface.
///
/// Rule (and search-target) decorations and selection decorations are scheduled independently;
/// rule highlighting ignores selection moves. Each set is replaced wholesale when its recompute
/// finishes; until then the previous set stays current.
#[derive(Debug)]
pub struct HighlightSurface {
    config: HighlightConfig,
    cache: FlattenCache,
    rule_scheduler: RecomputeScheduler,
    selection_scheduler: RecomputeScheduler,
    rule_decorations: Arc<DecorationSet>,
    selection_decorations: Arc<DecorationSet>,
}

impl HighlightSurface {
    /// Create a surface and compute its initial decorations.
    pub fn new(config: HighlightConfig, view: &HighlightView<'_>) -> Self {
        let mut cache = FlattenCache::new();
        let rule_decorations = Arc::new(compute_rules(&config, &mut cache, view));
        let selection_decorations = Arc::new(highlight_selection(&config.selection, view));
        Self {
            rule_scheduler: RecomputeScheduler::new(config.highlight_delay)
                .with_selection_triggers(false),
            selection_scheduler: RecomputeScheduler::new(config.selection.highlight_delay),
            config,
            cache,
            rule_decorations,
            selection_decorations,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Current rule and search-target decorations.
    pub fn rule_decorations(&self) -> Arc<DecorationSet> {
        Arc::clone(&self.rule_decorations)
    }

    /// Current selection decorations.
    pub fn selection_decorations(&self) -> Arc<DecorationSet> {
        Arc::clone(&self.selection_decorations)
    }

    /// States of the rule and selection schedulers.
    pub fn scheduler_states(&self) -> (SchedulerState, SchedulerState) {
        (self.rule_scheduler.state(), self.selection_scheduler.state())
    }

    /// Feed a host update. Returns `true` if a decoration set was replaced.
    pub fn update(&mut self, update: SurfaceUpdate, view: &HighlightView<'_>, now: Instant) -> bool {
        let rule_trigger = update.triggers().find(|t| self.rule_scheduler.accepts(*t));
        let selection_trigger = update
            .triggers()
            .find(|t| self.selection_scheduler.accepts(*t));

        let mut changed = false;
        if let Some(trigger) = rule_trigger {
            changed |= self.trigger_rules(trigger, view, now);
        }
        if let Some(trigger) = selection_trigger {
            changed |= self.trigger_selection(trigger, view, now);
        }
        changed
    }

    /// Run trailing recomputes that are due. Returns `true` if a decoration set was replaced.
    pub fn poll(&mut self, view: &HighlightView<'_>, now: Instant) -> bool {
        let rules = self
            .rule_scheduler
            .poll(now, |_| {
                self.rule_decorations = Arc::new(compute_rules(&self.config, &mut self.cache, view));
            })
            .is_some();
        let selection = self
            .selection_scheduler
            .poll(now, |_| {
                self.selection_decorations =
                    Arc::new(highlight_selection(&self.config.selection, view));
            })
            .is_some();
        rules || selection
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (
            self.rule_scheduler.next_deadline(),
            self.selection_scheduler.next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Apply a reconfiguration. A structurally identical config is a no-op; otherwise the
    /// debouncers are rebuilt for new delays and the affected highlighters re-triggered.
    /// Rebuilding a debouncer drops its pending call, so a highlighter whose delay changed is
    /// re-triggered as well. Returns `true` if a decoration set was replaced.
    pub fn apply_effect(
        &mut self,
        effect: ReconfigureEffect,
        view: &HighlightView<'_>,
        now: Instant,
    ) -> bool {
        let config = effect.config;
        if config == self.config {
            return false;
        }

        let rules_changed = config.rules != self.config.rules
            || config.search != self.config.search
            || config.excluded_categories != self.config.excluded_categories
            || config.rule_match_limit != self.config.rule_match_limit;
        let selection_changed = config.selection != self.config.selection;

        let rules_rebuilt = self.rule_scheduler.set_delay(config.highlight_delay);
        let selection_rebuilt = self
            .selection_scheduler
            .set_delay(config.selection.highlight_delay);
        tracing::debug!(
            rules_changed,
            selection_changed,
            rules_rebuilt,
            selection_rebuilt,
            "surface reconfigured"
        );
        self.config = config;

        let mut changed = false;
        if rules_changed {
            self.cache.clear();
        }
        if rules_changed || rules_rebuilt {
            changed |= self.trigger_rules(Trigger::ConfigChanged, view, now);
        }
        if selection_changed || selection_rebuilt {
            changed |= self.trigger_selection(Trigger::ConfigChanged, view, now);
        }
        changed
    }

    fn trigger_rules(&mut self, trigger: Trigger, view: &HighlightView<'_>, now: Instant) -> bool {
        self.rule_scheduler
            .trigger(trigger, now, |_| {
                self.rule_decorations = Arc::new(compute_rules(&self.config, &mut self.cache, view));
            })
            .is_some()
    }

    fn trigger_selection(
        &mut self,
        trigger: Trigger,
        view: &HighlightView<'_>,
        now: Instant,
    ) -> bool {
        self.selection_scheduler
            .trigger(trigger, now, |_| {
                self.selection_decorations =
                    Arc::new(highlight_selection(&self.config.selection, view));
            })
            .is_some()
    }
}

impl DecorationProvider for HighlightSurface {
    fn decoration_sets(&self) -> Vec<Arc<DecorationSet>> {
        vec![self.rule_decorations(), self.selection_decorations()]
    }
}

fn compute_rules(
    config: &HighlightConfig,
    cache: &mut FlattenCache,
    view: &HighlightView<'_>,
) -> DecorationSet {
    cache.retain_snapshot(view.snapshot);
    let search = view.path.and_then(|path| config.search.rules_for(path));
    let set = classify(
        std::iter::once(&config.rules).chain(search),
        &config.classify_options(),
        view,
        cache,
    );
    tracing::trace!(decorations = set.len(), "rule decorations rebuilt");
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_triggers_order() {
        let update = SurfaceUpdate {
            document_changed: true,
            viewport_changed: false,
            selection_changed: true,
        };
        let triggers: Vec<_> = update.triggers().collect();
        assert_eq!(
            triggers,
            vec![Trigger::DocumentChanged, Trigger::SelectionChanged]
        );
        assert_eq!(SurfaceUpdate::default().triggers().count(), 0);
    }
}
