//! Routing reconciliation policy.
//!
//! Two directions, two procedures:
//!
//! - **startup**: fragment → state. Runs once after the first committed
//!   render pass (and again on host-forwarded fragment-change events). A
//!   matching fragment is a plain jump; it does not retroactively mark the
//!   preceding steps as visited.
//! - **after-commit**: state → fragment. Runs after every committed pass
//!   that registered steps. Writes only when every step carries a non-empty
//!   title; a partially-titled set is a configuration warning, a fully
//!   untitled set is a valid routing-disabled wizard.

use serde::Serialize;

/// Titles collected from one render pass, in registration order.
pub type RouteTitles = [Option<String>];

/// Outcome of the after-commit reconciliation for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Reconciliation {
    /// No step registered during the pass; nothing to reconcile.
    Empty,
    /// Every step is titled; the active step's title was written.
    Synced { fragment: String },
    /// Every step is titled but the active index points past the collected
    /// set, so there is no title to write. Caller-defined territory.
    ActiveOutOfRange,
    /// Some steps are titled, some are not. No write; a warning names the
    /// untitled ordinals.
    MissingTitles { ordinals: Vec<usize> },
    /// No step is titled: a deliberate routing-disabled configuration.
    RoutingDisabled,
}

impl Reconciliation {
    /// Whether this outcome wrote the fragment.
    pub fn synced(&self) -> bool {
        matches!(self, Reconciliation::Synced { .. })
    }
}

/// The warning emitted for a partially-titled step set.
pub fn missing_title_warning(ordinals: &[usize]) -> String {
    let indices = ordinals
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("You have not specified a title for the steps with the indices: {indices}")
}

/// Resolve a fragment to the ordinal of the step carrying that title.
///
/// Absent and empty fragments never match; titles are matched verbatim,
/// first occurrence wins.
pub fn startup_target(fragment: Option<&str>, titles: &RouteTitles) -> Option<usize> {
    let fragment = fragment.filter(|f| !f.is_empty())?;
    titles
        .iter()
        .position(|title| title.as_deref() == Some(fragment))
}

/// Classify one pass worth of titles against the committed active index.
///
/// Pure policy: the caller performs the fragment write and emits the
/// warning based on the returned variant.
pub fn classify(titles: &RouteTitles, active_step_index: usize) -> Reconciliation {
    if titles.is_empty() {
        return Reconciliation::Empty;
    }

    let untitled: Vec<usize> = titles
        .iter()
        .enumerate()
        .filter(|(_, title)| title.as_deref().is_none_or(str::is_empty))
        .map(|(ordinal, _)| ordinal)
        .collect();

    if untitled.is_empty() {
        match titles.get(active_step_index) {
            Some(Some(title)) => Reconciliation::Synced {
                fragment: title.clone(),
            },
            _ => Reconciliation::ActiveOutOfRange,
        }
    } else if untitled.len() == titles.len() {
        Reconciliation::RoutingDisabled
    } else {
        Reconciliation::MissingTitles { ordinals: untitled }
    }
}
