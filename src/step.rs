//! Step descriptors and per-element registration caching.

use serde::Serialize;

use crate::error::WizardError;
use crate::wizard::Wizard;

/// Options for registering a step.
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
    /// Title used for routing sync. Steps without a title opt the whole
    /// wizard out of fragment writes (see the reconcile module).
    pub route_title: Option<String>,
}

impl StepOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            route_title: Some(title.into()),
        }
    }
}

/// One step's view of the wizard for a single render pass.
///
/// Ordinals are positional: the Nth registration call within a pass gets
/// ordinal N, regardless of which element issued it. Steps must therefore
/// register unconditionally and in stable relative order across renders;
/// conditionally skipping a registration shifts every later ordinal. That
/// contract is the caller's, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Zero-based position in registration order for the pass.
    pub ordinal: usize,
    /// Title handed to [`StepOptions`] at registration, if any.
    pub route_title: Option<String>,
    /// Whether this step's ordinal equals the active index.
    pub is_active: bool,
    /// Whether the max-activated high-water mark has reached this ordinal.
    pub has_been_active: bool,
}

impl Step {
    /// Advance to the step after this one.
    pub fn next_step(&self, wizard: &mut Wizard) {
        wizard.go_to_step(self.ordinal + 1);
    }

    /// Go to the step before this one, clamped at 0.
    pub fn previous_step(&self, wizard: &mut Wizard) {
        wizard.go_to_step(self.ordinal.saturating_sub(1));
    }

    /// Jump to this step, forgetting that any later step was visited.
    pub fn reset_to_step(&self, wizard: &mut Wizard) {
        wizard.reset_to_step(self.ordinal);
    }

    /// Jump to this step, keeping visited history.
    pub fn move_to_step(&self, wizard: &mut Wizard) {
        wizard.move_to_step(self.ordinal);
    }

    /// Jump to an arbitrary step.
    pub fn go_to_step(&self, wizard: &mut Wizard, index: usize) {
        wizard.go_to_step(index);
    }
}

/// Per-step-element registration cache.
///
/// A step element that re-renders on its own, without the wizard state
/// changing, must not register again: a second registration would consume a
/// fresh ordinal and corrupt active-step matching for the rest of the pass.
/// The slot caches the last descriptor together with the wizard version it
/// was derived from and replays it verbatim until the version moves.
#[derive(Debug, Default)]
pub struct StepSlot {
    cached: Option<(u64, Step)>,
}

impl StepSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve this element's descriptor against the wizard.
    ///
    /// Registers a new step when the wizard version has changed since the
    /// cached descriptor (or nothing is cached yet); otherwise returns the
    /// cached descriptor without touching the ordinal counter.
    ///
    /// # Errors
    ///
    /// [`WizardError::OutsideRenderPass`] when a registration is needed but
    /// no render pass is open.
    pub fn resolve(&mut self, wizard: &mut Wizard, options: StepOptions) -> Result<Step, WizardError> {
        if let Some((version, step)) = &self.cached {
            if *version == wizard.version() {
                return Ok(step.clone());
            }
        }

        let step = wizard.register_step(options)?;
        self.cached = Some((wizard.version(), step.clone()));
        Ok(step)
    }

    /// Drop the cached descriptor (element unmounted).
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
