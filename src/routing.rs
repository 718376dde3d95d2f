//! Routing-fragment abstraction.
//!
//! The wizard deep-links the active step through an injected fragment store
//! (the moral equivalent of `window.location.hash`). Implementations must be
//! safe to use in environments with no addressable location: return `None`
//! and swallow writes rather than fail.
//!
//! External change notifications are host plumbing: a host that receives a
//! platform fragment-change event calls [`Wizard::handle_route_change`]
//! itself.
//!
//! [`Wizard::handle_route_change`]: crate::wizard::Wizard::handle_route_change

use std::cell::RefCell;
use std::rc::Rc;

/// A readable/writable routing fragment.
pub trait RoutingService {
    /// The current fragment, or `None` when the environment has no
    /// addressable location (or the fragment is unset).
    fn current_fragment(&self) -> Option<String>;

    /// Replace the fragment. Silent no-op where no location exists.
    fn set_current_fragment(&mut self, fragment: &str);
}

/// Routing service for hosts without an addressable location.
///
/// Reads are always absent and writes are dropped, which leaves the wizard
/// fully functional with routing sync disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRouting;

impl RoutingService for NullRouting {
    fn current_fragment(&self) -> Option<String> {
        None
    }

    fn set_current_fragment(&mut self, _fragment: &str) {}
}

/// In-memory fragment store with a shareable handle.
///
/// The wizard owns one end; the host (or a test) keeps a [`RoutingHandle`]
/// to pre-set the fragment before mount or to observe writes. Single
/// logical UI thread, hence `Rc<RefCell<_>>`.
#[derive(Debug, Default, Clone)]
pub struct MemoryRouting {
    fragment: Rc<RefCell<Option<String>>>,
}

/// Host-side view of a [`MemoryRouting`] fragment.
#[derive(Debug, Clone)]
pub struct RoutingHandle {
    fragment: Rc<RefCell<Option<String>>>,
}

impl MemoryRouting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose fragment is already set (a pre-navigated URL).
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        let store = Self::new();
        *store.fragment.borrow_mut() = Some(fragment.into());
        store
    }

    /// A second view onto the same fragment cell.
    pub fn handle(&self) -> RoutingHandle {
        RoutingHandle {
            fragment: Rc::clone(&self.fragment),
        }
    }
}

impl RoutingService for MemoryRouting {
    fn current_fragment(&self) -> Option<String> {
        self.fragment.borrow().clone()
    }

    fn set_current_fragment(&mut self, fragment: &str) {
        *self.fragment.borrow_mut() = Some(fragment.to_string());
    }
}

impl RoutingHandle {
    pub fn fragment(&self) -> Option<String> {
        self.fragment.borrow().clone()
    }

    /// Simulate an external navigation (back button, manual URL edit).
    pub fn set_fragment(&self, fragment: impl Into<String>) {
        *self.fragment.borrow_mut() = Some(fragment.into());
    }

    pub fn clear(&self) {
        *self.fragment.borrow_mut() = None;
    }
}
