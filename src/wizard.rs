//! The wizard step-index state machine and render-pass protocol.
//!
//! A [`Wizard`] owns two indices: the step currently shown and the highest
//! step ever made active (the visited high-water mark behind
//! `has_been_active`). Both mutate only through the navigation operations,
//! and every committed mutation bumps a version counter. The version is
//! what step elements key their registration cache on: as long as it is
//! unchanged, a re-rendering element replays its cached descriptor instead
//! of consuming a fresh ordinal (see [`crate::step::StepSlot`]).
//!
//! The hosting render layer drives the protocol:
//!
//! 1. `begin_pass` before evaluating the wizard subtree;
//! 2. each step element resolves its descriptor top-to-bottom;
//! 3. `finish_pass` after the subtree committed, which reconciles the
//!    collected titles with the routing fragment and reports the outcome.

use std::fmt;

use serde::Serialize;

use crate::error::WizardError;
use crate::reconcile::{self, Reconciliation};
use crate::routing::{NullRouting, RoutingService};
use crate::step::{Step, StepOptions};

/// Payload handed to the change handler before a transition commits.
///
/// The handler is for external side effects; it cannot veto the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepChange {
    pub previous_step_index: usize,
    pub new_step_index: usize,
    /// The max-activated index the transition is about to commit, in its
    /// -1-for-never form.
    pub max_activated_step_index: i64,
}

/// Caller-facing navigation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationOptions {
    /// Suppress the change handler for this one transition.
    pub skip_on_change: bool,
}

type ChangeHandler = Box<dyn FnMut(&StepChange)>;

/// One open render pass: titles collected in registration order. The
/// ordinal counter is the length of the list.
struct RenderPass {
    titles: Vec<Option<String>>,
}

/// The wizard state machine.
pub struct Wizard {
    active_step_index: usize,
    /// Highest index ever made active; `None` until a step beyond the
    /// initial one is entered (the -1 state).
    max_activated: Option<usize>,
    /// Bumped on every committed transition. Step slots cache against it.
    version: u64,
    on_change: Option<ChangeHandler>,
    routing: Box<dyn RoutingService>,
    pass: Option<RenderPass>,
    /// Titles from the most recent pass that registered steps; what
    /// fragment-change re-entry matches against.
    committed_titles: Vec<Option<String>>,
    /// Whether startup reconciliation has run.
    started: bool,
}

/// Builder for [`Wizard`].
pub struct WizardBuilder {
    initial_step_index: usize,
    routing: Box<dyn RoutingService>,
    on_change: Option<ChangeHandler>,
}

impl Default for WizardBuilder {
    fn default() -> Self {
        Self {
            initial_step_index: 0,
            routing: Box::new(NullRouting),
            on_change: None,
        }
    }
}

impl WizardBuilder {
    /// Step shown before any navigation (default 0).
    pub fn initial_step_index(mut self, index: usize) -> Self {
        self.initial_step_index = index;
        self
    }

    /// Routing service to reconcile with (default [`NullRouting`]).
    pub fn routing(mut self, routing: impl RoutingService + 'static) -> Self {
        self.routing = Box::new(routing);
        self
    }

    /// Handler invoked before every non-suppressed transition.
    pub fn on_change(mut self, handler: impl FnMut(&StepChange) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Wizard {
        Wizard {
            active_step_index: self.initial_step_index,
            max_activated: self.initial_step_index.checked_sub(1),
            version: 0,
            on_change: self.on_change,
            routing: self.routing,
            pass: None,
            committed_titles: Vec::new(),
            started: false,
        }
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Wizard {
    pub fn builder() -> WizardBuilder {
        WizardBuilder::default()
    }

    /// Shorthand for a wizard with defaults everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_step_index(&self) -> usize {
        self.active_step_index
    }

    /// Highest index ever made active, -1 when no step has been left yet.
    pub fn max_activated_step_index(&self) -> i64 {
        self.max_activated.map_or(-1, |max| max as i64)
    }

    /// Current state version. Bumped on every committed transition.
    pub fn version(&self) -> u64 {
        self.version
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Jump to `index`, recording the departed step as visited.
    ///
    /// A no-op when `index` is already active: no version bump, no change
    /// handler. Any non-negative index is accepted, including ones beyond
    /// the registered steps; rendering nothing active is the caller's
    /// prerogative.
    pub fn go_to_step(&mut self, index: usize) {
        self.transition(index, false, false);
    }

    pub fn go_to_step_with(&mut self, index: usize, options: NavigationOptions) {
        self.transition(index, false, options.skip_on_change);
    }

    /// Alias of [`go_to_step`](Self::go_to_step) exposed to step callers.
    pub fn move_to_step(&mut self, index: usize) {
        self.transition(index, false, false);
    }

    pub fn move_to_step_with(&mut self, index: usize, options: NavigationOptions) {
        self.transition(index, false, options.skip_on_change);
    }

    /// Jump to `index` and forget that any step beyond it was visited:
    /// the high-water mark becomes `index - 1`.
    pub fn reset_to_step(&mut self, index: usize) {
        self.transition(index, true, false);
    }

    pub fn reset_to_step_with(&mut self, index: usize, options: NavigationOptions) {
        self.transition(index, true, options.skip_on_change);
    }

    pub fn next_step(&mut self) {
        self.go_to_step(self.active_step_index + 1);
    }

    /// Clamped at 0, never negative.
    pub fn previous_step(&mut self) {
        self.go_to_step(self.active_step_index.saturating_sub(1));
    }

    fn transition(&mut self, index: usize, reset_max: bool, skip_on_change: bool) {
        if index == self.active_step_index {
            return;
        }

        // Departing the current step records it as visited; a reset instead
        // rewinds the mark to just below the destination.
        let new_max = if reset_max {
            index.checked_sub(1)
        } else {
            Some(
                self.max_activated
                    .map_or(self.active_step_index, |max| max.max(self.active_step_index)),
            )
        };

        let change = StepChange {
            previous_step_index: self.active_step_index,
            new_step_index: index,
            max_activated_step_index: new_max.map_or(-1, |max| max as i64),
        };

        if !skip_on_change {
            if let Some(handler) = self.on_change.as_mut() {
                handler(&change);
            }
        }

        tracing::debug!(
            previous = change.previous_step_index,
            new = change.new_step_index,
            max_activated = change.max_activated_step_index,
            "wizard step transition"
        );

        self.active_step_index = index;
        self.max_activated = new_max;
        self.version += 1;
    }

    // ─── Render-pass protocol ───────────────────────────────────────────────

    /// Open a render pass: reset the ordinal counter and the title list.
    ///
    /// Calling this while a pass is already open abandons that pass, the
    /// same way a host restarting a render throws away the half-built tree.
    pub fn begin_pass(&mut self) {
        self.pass = Some(RenderPass { titles: Vec::new() });
    }

    /// Register the next step of the open pass and derive its descriptor.
    ///
    /// Ordinals are assigned strictly by call order. Step elements should
    /// go through [`crate::step::StepSlot::resolve`], which layers the
    /// version-keyed cache on top of this call.
    pub fn register_step(&mut self, options: StepOptions) -> Result<Step, WizardError> {
        let pass = self.pass.as_mut().ok_or(WizardError::OutsideRenderPass)?;

        let ordinal = pass.titles.len();
        pass.titles.push(options.route_title.clone());

        Ok(Step {
            ordinal,
            route_title: options.route_title,
            is_active: self.active_step_index == ordinal,
            has_been_active: self.max_activated.is_some_and(|max| max >= ordinal),
        })
    }

    /// Commit the open pass and reconcile with the routing service.
    ///
    /// A pass in which no step registered (every element replayed its
    /// cache) reconciles as [`Reconciliation::Empty`] and touches nothing.
    /// Otherwise startup reconciliation runs first if it has not yet
    /// (fragment → state, a plain jump that leaves visited history alone),
    /// then the after-commit direction (state → fragment) per the policy in
    /// [`crate::reconcile`].
    pub fn finish_pass(&mut self) -> Result<Reconciliation, WizardError> {
        let pass = self.pass.take().ok_or(WizardError::PassNotStarted)?;

        if pass.titles.is_empty() {
            return Ok(Reconciliation::Empty);
        }
        self.committed_titles = pass.titles;

        if !self.started {
            self.started = true;
            let fragment = self.routing.current_fragment();
            if let Some(target) =
                reconcile::startup_target(fragment.as_deref(), &self.committed_titles)
            {
                tracing::debug!(target, "startup fragment jump");
                self.go_to_step(target);
            }
        }

        let summary = reconcile::classify(&self.committed_titles, self.active_step_index);
        match &summary {
            Reconciliation::Synced { fragment } => {
                self.routing.set_current_fragment(fragment);
            }
            Reconciliation::MissingTitles { ordinals } => {
                tracing::warn!("{}", reconcile::missing_title_warning(ordinals));
            }
            Reconciliation::Empty
            | Reconciliation::ActiveOutOfRange
            | Reconciliation::RoutingDisabled => {}
        }
        Ok(summary)
    }

    /// Re-entry point for external fragment changes (back button, manual
    /// URL edit). Hosts with change notifications wire them here; each
    /// event is handled independently, no debouncing.
    ///
    /// Matches the current fragment against the titles of the last pass
    /// that registered steps and jumps on a hit. Unmatched or absent
    /// fragments are silent no-ops.
    pub fn handle_route_change(&mut self) {
        let fragment = self.routing.current_fragment();
        if let Some(target) = reconcile::startup_target(fragment.as_deref(), &self.committed_titles)
        {
            tracing::debug!(target, "external fragment jump");
            self.go_to_step(target);
        }
    }
}

impl fmt::Debug for Wizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("active_step_index", &self.active_step_index)
            .field("max_activated_step_index", &self.max_activated_step_index())
            .field("version", &self.version)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
