mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use common::{booking_form, Harness};
use overlay::guard::MIN_INTERVAL;
use overlay::{
    ConfirmDialog, EventResponse, OpenOutcome, OverlayAction, OverlayKind, OverlayOptions,
    ServiceConfig,
};
use surface::{Element, Key, Layer, Modifiers, PointerEvents, SurfaceEvent, SurfaceHandle};

fn escape() -> SurfaceEvent {
    SurfaceEvent::key(Key::Escape)
}

fn press_outside() -> SurfaceEvent {
    SurfaceEvent::pointer_down("summary")
}

/// `on_close` callback recording which dialog is mounted when it runs.
fn record_mounted_dialog(
    surface: SurfaceHandle,
    seen: Arc<Mutex<Vec<Option<String>>>>,
) -> impl FnOnce() + Send + 'static {
    move || {
        let mounted = surface.lock().layer(Layer::Dialog).map(|el| el.id.clone());
        seen.lock().unwrap().push(mounted);
    }
}

// ============================================================================
// Registry behavior through the facade
// ============================================================================

#[test]
fn test_open_dialog_is_active() {
    let mut h = Harness::new();

    let outcome = h.service.open_dialog(Element::text("X").id("x"), OverlayOptions::new());

    let handle = outcome.handle().unwrap();
    let active = h.service.get_active(OverlayKind::Dialog).unwrap();
    assert_eq!(active.content().id, "x");
    assert!(active.is_open());
    assert!(h.service.is_open(handle));
    assert!(h.surface.lock().layer(Layer::Dialog).is_some());
}

#[test]
fn test_close_dialog_when_empty_is_noop() {
    let mut h = Harness::new();

    assert!(!h.service.close_dialog());
    assert!(!h.service.close_dialog());
    assert!(h.service.get_active(OverlayKind::Dialog).is_none());
    assert!(h.surface.lock().is_interactive());
}

#[test]
fn test_at_most_one_dialog() {
    let mut h = Harness::new();

    for i in 0..5 {
        h.service.open_dialog(booking_form(&format!("form{i}")), OverlayOptions::new());
        if i % 2 == 0 {
            h.service.close_dialog();
            h.service.close_dialog();
        }
        h.service.open_dialog(booking_form(&format!("again{i}")), OverlayOptions::new());
    }
    h.settle();

    assert!(h.service.get_active(OverlayKind::Dialog).is_some());
    assert_eq!(h.service.get_active(OverlayKind::Dialog).unwrap().content().id, "again4");
    assert_eq!(h.service.top(), Some(OverlayKind::Dialog));
}

#[test]
fn test_locked_dialog_is_not_replaced() {
    let mut h = Harness::new();
    h.service.open_dialog(
        Element::text("A").id("a"),
        OverlayOptions::new().prevent_outside_close(true),
    );

    let outcome = h.service.open_dialog(Element::text("B").id("b"), OverlayOptions::new());

    assert_eq!(outcome, OpenOutcome::Ignored);
    assert_eq!(h.service.get_active(OverlayKind::Dialog).unwrap().content().id, "a");
    assert_eq!(h.surface.lock().layer(Layer::Dialog).map(|el| el.id.as_str()), Some("a"));
}

#[test]
fn test_replace_fires_on_close_before_swap() {
    let mut h = Harness::new();
    let closes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&closes);
    h.service.open_dialog(
        booking_form("first"),
        OverlayOptions::new().on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let outcome = h.service.open_dialog(booking_form("second"), OverlayOptions::new());

    assert!(matches!(outcome, OpenOutcome::Replaced(_)));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    h.service.close_dialog();
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_on_close_can_use_surface() {
    let mut h = Harness::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    h.service.open_dialog(
        booking_form("first"),
        OverlayOptions::new().on_close(record_mounted_dialog(h.surface.clone(), Arc::clone(&seen))),
    );
    h.service.open_dialog(
        booking_form("second"),
        OverlayOptions::new().on_close(record_mounted_dialog(h.surface.clone(), Arc::clone(&seen))),
    );

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        h.service.close_dialog();
        let _ = tx.send(h);
    });
    let h = rx
        .recv_timeout(Duration::from_secs(2))
        .expect("close_dialog did not return");

    // Each callback ran before its own content was unmounted
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("first".to_string()), Some("second".to_string())]
    );
    assert!(h.surface.lock().layer(Layer::Dialog).is_none());
}

#[test]
fn test_stale_handle_closes_nothing() {
    let mut h = Harness::new();
    let first = h
        .service
        .open_dialog(booking_form("first"), OverlayOptions::new())
        .handle()
        .unwrap();
    h.service.open_dialog(booking_form("second"), OverlayOptions::new());

    assert!(!h.service.is_open(first));
    assert!(!h.service.close_handle(first));
    assert_eq!(h.service.get_active(OverlayKind::Dialog).unwrap().content().id, "second");
}

// ============================================================================
// Focus lifecycle
// ============================================================================

#[test]
fn test_focus_moves_in_and_returns() {
    let mut h = Harness::new();
    h.focus("save");

    h.service.open_dialog(booking_form("form"), OverlayOptions::new());
    assert_eq!(h.focused().as_deref(), Some("form-pickup"));

    h.service.close_dialog();
    // Teardown dropped focus; restoration waits for the settle delay
    assert_eq!(h.focused(), None);
    h.clock.advance(Duration::from_millis(5));
    h.service.tick();
    assert_eq!(h.focused(), None);

    h.settle();
    assert_eq!(h.focused().as_deref(), Some("save"));
}

#[test]
fn test_restore_skipped_when_target_detached() {
    let mut h = Harness::new();
    h.focus("save");
    h.service.open_dialog(booking_form("form"), OverlayOptions::new());
    h.service.close_dialog();

    // The toolbar goes away before the restore fires
    h.surface.with(|s| s.mount(Element::col().id("app").child(Element::text("empty"))));
    h.settle();

    assert_eq!(h.focused(), None);
}

#[test]
fn test_initial_and_final_focus_targets() {
    let mut h = Harness::new();
    h.focus("save");

    h.service.open_dialog(
        booking_form("form"),
        OverlayOptions::new()
            .initial_focus("form-close")
            .final_focus("export"),
    );
    assert_eq!(h.focused().as_deref(), Some("form-close"));

    h.service.close_dialog();
    h.settle();
    assert_eq!(h.focused().as_deref(), Some("export"));
}

#[test]
fn test_replacement_keeps_original_snapshot() {
    let mut h = Harness::new();
    h.focus("save");

    h.service.open_dialog(booking_form("first"), OverlayOptions::new());
    h.service.open_dialog(booking_form("second"), OverlayOptions::new());
    assert_eq!(h.focused().as_deref(), Some("second-pickup"));

    h.service.close_dialog();
    h.settle();
    assert_eq!(h.focused().as_deref(), Some("save"));
}

#[test]
fn test_reopen_before_settle_keeps_return_target() {
    let mut h = Harness::new();
    h.focus("save");

    h.service.open_dialog(booking_form("first"), OverlayOptions::new());
    h.service.close_dialog();
    // Reopened before the restore had a chance to run
    h.service.open_dialog(booking_form("second"), OverlayOptions::new());
    h.settle();
    assert_eq!(h.focused().as_deref(), Some("second-pickup"));

    h.service.close_dialog();
    h.settle();
    assert_eq!(h.focused().as_deref(), Some("save"));
}

#[test]
fn test_content_without_focusable_leaves_focus() {
    let mut h = Harness::new();
    h.focus("export");

    h.service.open_drawer(
        Element::col().id("notice").child(Element::text("Synced")),
        OverlayOptions::new(),
    );
    assert_eq!(h.focused().as_deref(), Some("export"));
}

#[test]
fn test_tab_is_trapped() {
    let mut h = Harness::new();
    h.service.open_dialog(booking_form("form"), OverlayOptions::new());

    let tab = SurfaceEvent::key(Key::Tab);
    assert_eq!(h.service.handle_event(tab.clone()), EventResponse::Consumed);
    assert_eq!(h.focused().as_deref(), Some("form-close"));
    h.service.handle_event(tab);
    assert_eq!(h.focused().as_deref(), Some("form-pickup"));

    h.service.handle_event(SurfaceEvent::Key {
        key: Key::Tab,
        modifiers: Modifiers::shift(),
    });
    assert_eq!(h.focused().as_deref(), Some("form-close"));
}

// ============================================================================
// Dismissal
// ============================================================================

#[test]
fn test_escape_dismisses() {
    let mut h = Harness::new();
    h.focus("save");
    h.service.open_dialog(booking_form("form"), OverlayOptions::new());

    assert_eq!(h.service.handle_event(escape()), EventResponse::Consumed);
    assert!(h.service.get_active(OverlayKind::Dialog).is_none());

    h.settle();
    assert_eq!(h.focused().as_deref(), Some("save"));
}

#[test]
fn test_locked_overlay_ignores_escape_and_outside_press() {
    let mut h = Harness::new();
    h.service.open_dialog(booking_form("form"), OverlayOptions::new().prevent_outside_close(true));

    assert_eq!(h.service.handle_event(escape()), EventResponse::Ignored);
    assert_eq!(h.service.handle_event(press_outside()), EventResponse::Ignored);
    assert!(h.service.get_active(OverlayKind::Dialog).is_some());

    // Explicit close still works
    assert!(h.service.close_dialog());
}

#[test]
fn test_outside_press_dismisses_inside_does_not() {
    let mut h = Harness::new();
    h.service.open_drawer(booking_form("filters"), OverlayOptions::new().title("Filters"));

    h.service.handle_event(SurfaceEvent::pointer_down("filters-pickup"));
    assert!(h.service.get_active(OverlayKind::Drawer).is_some());

    h.service.handle_event(SurfaceEvent::TouchStart { target: None });
    assert!(h.service.get_active(OverlayKind::Drawer).is_none());
}

#[test]
fn test_escape_closes_top_overlay_first() {
    let mut h = Harness::new();
    h.service.open_drawer(booking_form("drawer"), OverlayOptions::new());
    h.service.open_dialog(booking_form("dialog"), OverlayOptions::new());

    h.service.handle_event(escape());
    assert!(h.service.get_active(OverlayKind::Dialog).is_none());
    assert!(h.service.get_active(OverlayKind::Drawer).is_some());

    h.service.handle_event(escape());
    assert!(h.service.get_active(OverlayKind::Drawer).is_none());
    assert_eq!(h.service.top(), None);
}

#[test]
fn test_drawer_opened_under_dialog_stays_behind() {
    let mut h = Harness::new();
    h.service.open_dialog(booking_form("dialog"), OverlayOptions::new());
    h.service.open_drawer(booking_form("drawer"), OverlayOptions::new());

    assert_eq!(h.service.top(), Some(OverlayKind::Dialog));
    assert_eq!(h.focused().as_deref(), Some("dialog-pickup"));

    h.service.handle_event(escape());
    assert!(h.service.get_active(OverlayKind::Dialog).is_none());
    assert!(h.service.get_active(OverlayKind::Drawer).is_some());
    assert_eq!(h.service.top(), Some(OverlayKind::Drawer));
}

#[test]
fn test_events_without_overlay_are_ignored() {
    let mut h = Harness::new();
    assert_eq!(h.service.handle_event(escape()), EventResponse::Ignored);
    assert_eq!(h.service.handle_event(press_outside()), EventResponse::Ignored);
}

#[test]
fn test_close_action_button() {
    let mut h = Harness::new();
    let content = Element::col()
        .id("notes")
        .child(OverlayAction::Close.tag(Element::button("Done").id("done")));
    h.service.open_drawer(content, OverlayOptions::new().prevent_outside_close(true));

    h.service.handle_event(SurfaceEvent::pointer_down("done"));
    assert!(h.service.get_active(OverlayKind::Drawer).is_none());
}

// ============================================================================
// Confirm dialogs
// ============================================================================

#[test]
fn test_confirm_resolves_true_on_confirm() {
    let mut h = Harness::new();
    let (outcome, mut answer) = h.service.confirm(ConfirmDialog::new("Cancel transfer #42?"));
    assert!(outcome.handle().is_some());

    // Initial focus on Cancel, Tab to Ok, Enter
    h.service.handle_event(SurfaceEvent::key(Key::Tab));
    h.service.handle_event(SurfaceEvent::key(Key::Enter));

    assert_eq!(answer.try_recv(), Ok(true));
    assert!(h.service.get_active(OverlayKind::Dialog).is_none());
}

#[test]
fn test_confirm_resolves_false_on_dismiss() {
    let mut h = Harness::new();
    let (_, mut answer) = h.service.confirm(ConfirmDialog::new("Discard changes?"));

    h.service.handle_event(escape());
    assert_eq!(answer.try_recv(), Ok(false));
}

#[test]
fn test_confirm_resolves_false_when_replaced() {
    let mut h = Harness::new();
    let (_, mut first) = h.service.confirm(ConfirmDialog::new("First?"));
    let (_, mut second) = h.service.confirm(ConfirmDialog::new("Second?"));

    assert_eq!(first.try_recv(), Ok(false));
    assert!(second.try_recv().is_err());
}

#[test]
fn test_confirm_refused_by_locked_dialog() {
    let mut h = Harness::new();
    h.service.open_dialog(booking_form("form"), OverlayOptions::new().prevent_outside_close(true));

    let (outcome, mut answer) = h.service.confirm(ConfirmDialog::new("Really?"));
    assert!(outcome.is_ignored());
    assert_eq!(answer.try_recv(), Ok(false));
}

// ============================================================================
// Pointer guard through the facade
// ============================================================================

#[test]
fn test_open_and_close_correct_pointer_state() {
    let mut h = Harness::new();

    h.surface.with(|s| s.set_pointer_events(PointerEvents::None)).unwrap();
    h.service.open_dialog(booking_form("form"), OverlayOptions::new());
    assert!(h.surface.lock().is_interactive());

    h.surface.with(|s| s.set_pointer_events(PointerEvents::None)).unwrap();
    h.service.close_dialog();
    assert!(h.surface.lock().is_interactive());
}

#[test]
fn test_pointer_flag_recovers_within_interval() {
    let mut h = Harness::new();
    let interval = h.service.config().guard_interval;
    let step = Duration::from_millis(250);

    // Overlay churn with a third party disabling the root in between
    for round in 0..8u32 {
        if round % 2 == 0 {
            h.service.open_dialog(booking_form("form"), OverlayOptions::new());
        } else {
            h.service.close_dialog();
        }
        h.surface.with(|s| s.set_pointer_events(PointerEvents::None)).unwrap();

        // Sampled once per interval, the flag is always back to enabled
        let mut waited = Duration::ZERO;
        while waited < interval {
            h.clock.advance(step);
            h.service.tick();
            waited += step;
        }
        assert!(h.surface.lock().is_interactive(), "round {round}");
    }
}

#[test]
fn test_interaction_event_re_enables_pointer() {
    let mut h = Harness::new();
    h.surface.with(|s| s.set_pointer_events(PointerEvents::None)).unwrap();

    h.service.handle_event(SurfaceEvent::PointerMove { x: 3, y: 4 });
    assert!(h.surface.lock().is_interactive());
}

#[test]
fn test_zero_guard_interval_keeps_future_deadline() {
    let mut h = Harness::with_config(ServiceConfig {
        guard_interval: Duration::ZERO,
        ..ServiceConfig::default()
    });

    for _ in 0..3 {
        h.service.tick();
        let now = h.clock.now();
        assert!(h.service.next_deadline().is_some_and(|at| at > now));
        h.clock.advance(MIN_INTERVAL);
    }
}

#[test]
fn test_scroll_lock_released_after_delay() {
    let mut h = Harness::new();
    h.surface.with(|s| s.set_scroll_locked(true)).unwrap();
    h.service.tick();
    assert!(h.surface.lock().is_scroll_locked());

    h.clock.advance(h.service.config().correction_delay);
    h.service.tick();
    assert!(!h.surface.lock().is_scroll_locked());
}

#[test]
fn test_shutdown_cancels_everything() {
    let mut h = Harness::new();
    h.focus("save");
    h.service.open_dialog(booking_form("form"), OverlayOptions::new());
    h.service.close_dialog();

    h.service.shutdown();
    assert_eq!(h.service.next_deadline(), None);
    assert!(!h.surface.lock().is_observed());

    h.settle();
    assert_eq!(h.focused(), None);

    h.surface.with(|s| s.set_pointer_events(PointerEvents::None)).unwrap();
    h.clock.advance(Duration::from_secs(5));
    h.service.tick();
    assert!(!h.surface.lock().is_interactive());
}

#[test]
fn test_drop_detaches_observer() {
    let h = Harness::new();
    let surface = h.surface.clone();
    assert!(surface.lock().is_observed());

    drop(h);
    assert!(!surface.lock().is_observed());
}
