//! stepflow - a state-management core for multi-step wizard flows.
//!
//! The crate owns the step-index state machine, the render-order step
//! registration protocol, and the bidirectional reconciliation between the
//! active step and a routing fragment (deep links, back button). It renders
//! nothing itself: a hosting UI layer drives it by opening a render pass,
//! resolving one [`Step`] descriptor per step element top-to-bottom, and
//! committing the pass. See the `stepflow-demo` binary for a complete
//! ratatui host.
//!
//! ```
//! use stepflow::{MemoryRouting, StepOptions, Wizard};
//!
//! let mut wizard = Wizard::builder().routing(MemoryRouting::new()).build();
//!
//! wizard.begin_pass();
//! let first = wizard.register_step(StepOptions::titled("FirstStep")).unwrap();
//! let second = wizard.register_step(StepOptions::titled("SecondStep")).unwrap();
//! wizard.finish_pass().unwrap();
//!
//! assert!(first.is_active);
//! first.next_step(&mut wizard);
//! assert_eq!(wizard.active_step_index(), second.ordinal);
//! ```

pub mod error;
pub mod reconcile;
pub mod routing;
pub mod step;
pub mod wizard;

pub use error::WizardError;
pub use reconcile::Reconciliation;
pub use routing::{MemoryRouting, NullRouting, RoutingHandle, RoutingService};
pub use step::{Step, StepOptions, StepSlot};
pub use wizard::{NavigationOptions, StepChange, Wizard, WizardBuilder};
