//! End-to-end wizard flows through the full render-pass protocol.
//!
//! A small harness stands in for the hosting component framework: it renders
//! a fixed step tree top-to-bottom through `StepSlot`s and, like a real
//! host, re-renders until the wizard state stops moving (a deep-link jump
//! during mount schedules exactly one more pass).

use stepflow::{
    MemoryRouting, Reconciliation, RoutingHandle, Step, StepOptions, StepSlot, Wizard, WizardError,
};

struct Harness {
    wizard: Wizard,
    slots: Vec<StepSlot>,
    titles: Vec<Option<&'static str>>,
}

impl Harness {
    fn new(wizard: Wizard, titles: &[Option<&'static str>]) -> Self {
        Self {
            wizard,
            slots: titles.iter().map(|_| StepSlot::new()).collect(),
            titles: titles.to_vec(),
        }
    }

    /// One render pass over the whole step tree.
    fn render(&mut self) -> (Vec<Step>, Reconciliation) {
        self.wizard.begin_pass();
        let mut steps = Vec::new();
        for (slot, title) in self.slots.iter_mut().zip(&self.titles) {
            let options = match title {
                Some(title) => StepOptions::titled(*title),
                None => StepOptions::default(),
            };
            steps.push(slot.resolve(&mut self.wizard, options).unwrap());
        }
        let summary = self.wizard.finish_pass().unwrap();
        (steps, summary)
    }

    /// Render until no pass changes the state any further.
    fn render_stable(&mut self) -> (Vec<Step>, Reconciliation) {
        loop {
            let version = self.wizard.version();
            let result = self.render();
            if self.wizard.version() == version {
                return result;
            }
        }
    }
}

fn titled_harness(routing: MemoryRouting, titles: &[Option<&'static str>]) -> Harness {
    Harness::new(Wizard::builder().routing(routing).build(), titles)
}

#[test]
fn mount_writes_the_first_step_title() {
    let routing = MemoryRouting::new();
    let handle = routing.handle();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);

    let (steps, summary) = host.render_stable();
    assert_eq!(handle.fragment(), Some("FirstStep".to_string()));
    assert!(summary.synced());
    assert!(steps[0].is_active);
    assert!(!steps[1].is_active);
}

#[test]
fn navigation_keeps_fragment_and_history_in_step() {
    let routing = MemoryRouting::new();
    let handle = routing.handle();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);
    let (steps, _) = host.render_stable();

    // Click "next" on the first step.
    steps[0].next_step(&mut host.wizard);
    let (steps, _) = host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 1);
    assert_eq!(handle.fragment(), Some("SecondStep".to_string()));

    // Click "previous" on the second step: back to 0, history intact.
    steps[1].previous_step(&mut host.wizard);
    let (steps, _) = host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 0);
    assert_eq!(host.wizard.max_activated_step_index(), 1);
    assert_eq!(handle.fragment(), Some("FirstStep".to_string()));
    assert!(steps[1].has_been_active);
}

#[test]
fn preset_fragment_deep_links_into_the_matching_step() {
    let routing = MemoryRouting::with_fragment("SecondStep");
    let handle = routing.handle();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);

    let (steps, _) = host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 1);
    assert!(steps[1].is_active);
    assert_eq!(handle.fragment(), Some("SecondStep".to_string()));
}

#[test]
fn deep_link_is_a_plain_jump_not_a_visited_sweep() {
    let routing = MemoryRouting::with_fragment("ThirdStep");
    let mut host = titled_harness(
        routing,
        &[Some("FirstStep"), Some("SecondStep"), Some("ThirdStep")],
    );

    let (steps, _) = host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 2);
    // Only the departed initial step is marked visited, not everything
    // before the landing point.
    assert_eq!(host.wizard.max_activated_step_index(), 0);
    assert!(steps[0].has_been_active);
    assert!(!steps[1].has_been_active);
}

#[test]
fn unknown_fragment_falls_back_to_the_initial_step() {
    let routing = MemoryRouting::with_fragment("NoSuchStep");
    let handle = routing.handle();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);

    host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 0);
    assert_eq!(handle.fragment(), Some("FirstStep".to_string()));
}

#[test]
fn partially_titled_steps_warn_and_skip_the_write() {
    let routing = MemoryRouting::new();
    let handle = routing.handle();
    let mut host = titled_harness(routing, &[None, Some("SecondStep"), None]);

    let (_, summary) = host.render_stable();
    assert_eq!(
        summary,
        Reconciliation::MissingTitles {
            ordinals: vec![0, 2]
        }
    );
    assert_eq!(handle.fragment(), None);

    if let Reconciliation::MissingTitles { ordinals } = &summary {
        assert_eq!(
            stepflow::reconcile::missing_title_warning(ordinals),
            "You have not specified a title for the steps with the indices: 0, 2"
        );
    }
}

#[test]
fn fully_untitled_wizard_is_routing_disabled() {
    let routing = MemoryRouting::new();
    let handle = routing.handle();
    let mut host = titled_harness(routing, &[None, None, None]);

    let (_, summary) = host.render_stable();
    assert_eq!(summary, Reconciliation::RoutingDisabled);
    assert_eq!(handle.fragment(), None);

    // Navigation still works without routing.
    host.wizard.next_step();
    let (steps, summary) = host.render_stable();
    assert_eq!(summary, Reconciliation::RoutingDisabled);
    assert!(steps[1].is_active);
}

#[test]
fn rerender_without_mutation_replays_descriptors() {
    let routing = MemoryRouting::new();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);

    let (first, _) = host.render_stable();
    let (second, summary) = host.render();

    assert_eq!(first, second);
    // Every element replayed its cache, so nothing registered this pass.
    assert_eq!(summary, Reconciliation::Empty);
}

#[test]
fn ordinals_are_positional_and_reassigned_after_mutation() {
    let routing = MemoryRouting::new();
    let mut host = titled_harness(
        routing,
        &[Some("FirstStep"), Some("SecondStep"), Some("ThirdStep")],
    );

    let (steps, _) = host.render_stable();
    assert_eq!(
        steps.iter().map(|s| s.ordinal).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    host.wizard.next_step();
    let (steps, _) = host.render_stable();
    assert_eq!(
        steps.iter().map(|s| s.ordinal).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(steps[1].is_active);
}

#[test]
fn independent_element_rerender_reuses_its_slot_cache() {
    let mut wizard = Wizard::new();
    let mut slot = StepSlot::new();

    wizard.begin_pass();
    let original = slot.resolve(&mut wizard, StepOptions::default()).unwrap();
    wizard.finish_pass().unwrap();

    // The element re-renders on its own, outside any wizard pass: the
    // cached descriptor comes back and no ordinal is consumed.
    let replayed = slot.resolve(&mut wizard, StepOptions::default()).unwrap();
    assert_eq!(original, replayed);

    // After a mutation the cache is stale, and re-registering outside a
    // pass is the fatal usage error.
    wizard.next_step();
    assert_eq!(
        slot.resolve(&mut wizard, StepOptions::default()),
        Err(WizardError::OutsideRenderPass)
    );
}

#[test]
fn invalidated_slot_registers_fresh_on_the_next_pass() {
    let mut wizard = Wizard::new();
    let mut slot = StepSlot::new();

    wizard.begin_pass();
    let first = slot.resolve(&mut wizard, StepOptions::default()).unwrap();
    wizard.finish_pass().unwrap();
    assert_eq!(first.ordinal, 0);

    // The element unmounted: its cache is gone, so the next resolve must
    // register again even though the wizard version never moved.
    slot.invalidate();
    assert_eq!(
        slot.resolve(&mut wizard, StepOptions::default()),
        Err(WizardError::OutsideRenderPass)
    );

    wizard.begin_pass();
    let remounted = slot.resolve(&mut wizard, StepOptions::default()).unwrap();
    wizard.finish_pass().unwrap();
    assert_eq!(remounted.ordinal, 0);
}

#[test]
fn step_bound_go_to_step_jumps_to_an_arbitrary_index() {
    let routing = MemoryRouting::new();
    let handle = routing.handle();
    let mut host = titled_harness(
        routing,
        &[Some("FirstStep"), Some("SecondStep"), Some("ThirdStep")],
    );
    let (steps, _) = host.render_stable();

    // Unlike the other bound operations, go_to_step is not tied to the
    // step's own ordinal.
    steps[0].go_to_step(&mut host.wizard, 2);
    let (steps, _) = host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 2);
    assert!(steps[2].is_active);
    assert_eq!(handle.fragment(), Some("ThirdStep".to_string()));
}

#[test]
fn external_fragment_change_jumps_to_the_matching_step() {
    let routing = MemoryRouting::new();
    let handle: RoutingHandle = routing.handle();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);
    host.render_stable();

    // Back-button / manual URL edit, forwarded by the host.
    handle.set_fragment("SecondStep");
    host.wizard.handle_route_change();
    let (steps, _) = host.render_stable();
    assert_eq!(host.wizard.active_step_index(), 1);
    assert!(steps[1].is_active);

    // An unmatched external value is a silent no-op.
    handle.set_fragment("Bogus");
    host.wizard.handle_route_change();
    assert_eq!(host.wizard.active_step_index(), 1);
}

#[test]
fn nested_wizards_are_isolated() {
    let outer_routing = MemoryRouting::new();
    let inner_routing = MemoryRouting::new();
    let mut outer = titled_harness(outer_routing, &[Some("OuterA"), Some("OuterB")]);
    let mut inner = titled_harness(inner_routing, &[Some("InnerA"), Some("InnerB")]);

    outer.render_stable();
    inner.render_stable();

    outer.wizard.next_step();
    outer.render_stable();
    assert_eq!(outer.wizard.active_step_index(), 1);
    assert_eq!(inner.wizard.active_step_index(), 0);
    assert_eq!(inner.wizard.version(), 0);
}

#[test]
fn event_surface_serializes_for_host_logging() {
    let routing = MemoryRouting::new();
    let mut host = titled_harness(routing, &[Some("FirstStep"), Some("SecondStep")]);
    let (steps, summary) = host.render_stable();

    let step_json = serde_json::to_value(&steps[0]).unwrap();
    assert_eq!(step_json["ordinal"], 0);
    assert_eq!(step_json["is_active"], true);

    let summary_json = serde_json::to_value(&summary).unwrap();
    assert_eq!(summary_json["outcome"], "synced");
    assert_eq!(summary_json["fragment"], "FirstStep");
}
