//! Property-based invariant tests for the drag controller.
//!
//! ## Invariants
//!
//! 1. Clamping: after every call, `0 ≤ current ≤ max`.
//! 2. Exclusivity: `active_source` is set exactly while the phase is `Dragging`,
//!    and an idle panel rests at its default height.
//! 3. Begin while dragging is a no-op for state and host.
//! 4. Release decision is total and binary.
//! 5. Release decision is monotone in height and velocity.
//! 6. Re-applying unchanged insets is idempotent.
//! 7. Closed is terminal.

use pullsheet_core::release::{self, ReleaseDecision, ReleaseThresholds};
use pullsheet_core::{
    AnimationToken, ContainerHost, DragController, DragSink, Phase, SheetConfig, SourceId,
};
use proptest::prelude::*;

#[derive(Debug, Default)]
struct CountingHost {
    available: f64,
    calls: usize,
}

impl ContainerHost for CountingHost {
    fn query_available_height(&self) -> f64 {
        self.available
    }
    fn did_update_height(&mut self, _: f64) {
        self.calls += 1;
    }
    fn did_request_snap_back(&mut self, _: f64, _: AnimationToken) {
        self.calls += 1;
    }
    fn did_request_close(&mut self) {
        self.calls += 1;
    }
}

#[derive(Debug, Clone)]
enum Op {
    Begin(SourceId),
    Change(SourceId, f64, f64),
    End(SourceId, f64),
    Complete,
    Push(f64),
    Insets(f64, f64),
}

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_source() -> impl Strategy<Value = SourceId> {
    prop_oneof![Just(SourceId::Pointer), Just(SourceId::Scroll)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_source().prop_map(Op::Begin),
        (arb_source(), -2000.0..2000.0f64, -3000.0..3000.0f64)
            .prop_map(|(s, t, v)| Op::Change(s, t, v)),
        (arb_source(), -3000.0..3000.0f64).prop_map(|(s, v)| Op::End(s, v)),
        Just(Op::Complete),
        (0.0..1500.0f64).prop_map(Op::Push),
        (0.0..200.0f64, 0.0..100.0f64).prop_map(|(t, b)| Op::Insets(t, b)),
    ]
}

fn arb_thresholds() -> impl Strategy<Value = ReleaseThresholds> {
    (0.0..=1.0f64, 0.0..5000.0f64).prop_map(|(close_fraction, close_velocity)| {
        ReleaseThresholds {
            close_fraction,
            close_velocity,
        }
    })
}

fn controller(available: f64) -> DragController<CountingHost> {
    DragController::new(
        CountingHost {
            available,
            calls: 0,
        },
        SheetConfig::default(),
    )
}

fn apply(c: &mut DragController<CountingHost>, op: &Op) -> bool {
    match *op {
        Op::Begin(s) => c.on_drag_begin(s).is_ok(),
        Op::Change(s, t, v) => c.on_drag_change(s, t, v).is_ok(),
        Op::End(s, v) => c.on_drag_end(s, v).is_ok(),
        Op::Complete => match c.pending_animation() {
            Some(token) => c.animation_did_complete(token).is_ok(),
            None => false,
        },
        Op::Push(h) => c.set_default_position(h).is_ok(),
        Op::Insets(t, b) => c.update_insets(t, b).is_ok(),
    }
}

// ── 1 + 2. Clamping, exclusivity, resting height ──────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn height_stays_within_bounds(
        available in 0.0..1200.0f64,
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let mut c = controller(available);
        for op in &ops {
            apply(&mut c, op);
            let h = c.current_height();
            let max = c.maximum_available_height();
            prop_assert!(h >= 0.0, "h={h} after {op:?}");
            prop_assert!(h <= max, "h={h} max={max} after {op:?}");
            prop_assert_eq!(c.active_source().is_some(), c.phase() == Phase::Dragging);
            prop_assert!(c.default_height() <= max + 1e-9);
            if c.phase() == Phase::Idle {
                prop_assert!(
                    (h - c.default_height()).abs() <= 1e-6,
                    "idle at {h} with default {} after {op:?}",
                    c.default_height()
                );
            }
        }
    }
}

// ── 3. Begin while dragging ───────────────────────────────────────────────

proptest! {
    #[test]
    fn begin_while_dragging_changes_nothing(
        first in arb_source(),
        second in arb_source(),
        translation in -500.0..500.0f64,
    ) {
        let mut c = controller(800.0);
        c.set_default_position(400.0).unwrap();
        let token = c.pending_animation().unwrap();
        c.animation_did_complete(token).unwrap();

        c.on_drag_begin(first).unwrap();
        c.on_drag_change(first, translation, 0.0).unwrap();
        let height = c.current_height();
        let calls = c.host().calls;

        prop_assert!(c.on_drag_begin(second).is_err());
        prop_assert_eq!(c.current_height(), height);
        prop_assert_eq!(c.active_source(), Some(first));
        prop_assert_eq!(c.host().calls, calls);
    }
}

// ── 4 + 5. Release decision ───────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn decision_is_close_or_snap_to_default(
        current in 0.0..2000.0f64,
        default in 0.0..2000.0f64,
        velocity in -5000.0..5000.0f64,
        t in arb_thresholds(),
    ) {
        match release::decide(current, default, velocity, t) {
            ReleaseDecision::Close => {
                prop_assert!(current < default * t.close_fraction || velocity > t.close_velocity);
            }
            ReleaseDecision::SnapBack(target) => prop_assert_eq!(target, default),
        }
    }

    #[test]
    fn lower_or_faster_never_reopens(
        current in 0.0..2000.0f64,
        lower in 0.0..1.0f64,
        default in 0.0..2000.0f64,
        velocity in -5000.0..5000.0f64,
        extra in 0.0..3000.0f64,
        t in arb_thresholds(),
    ) {
        if release::decide(current, default, velocity, t).is_close() {
            prop_assert!(release::decide(current * lower, default, velocity, t).is_close());
            prop_assert!(release::decide(current, default, velocity + extra, t).is_close());
        }
    }
}

// ── 6. Idempotent insets ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn unchanged_insets_are_silent(
        available in 100.0..1200.0f64,
        content in 0.0..1500.0f64,
        top in 0.0..80.0f64,
        bottom in 0.0..40.0f64,
    ) {
        let mut c = controller(available);
        c.update_insets(top, bottom).unwrap();
        c.set_default_position(content).unwrap();
        if let Some(token) = c.pending_animation() {
            c.animation_did_complete(token).unwrap();
        }
        let before = (c.phase(), c.current_height(), c.default_height(), c.host().calls);

        c.update_insets(top, bottom).unwrap();
        let after = (c.phase(), c.current_height(), c.default_height(), c.host().calls);
        prop_assert_eq!(before, after);
    }
}

// ── 7. Closed is terminal ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn nothing_leaves_closed(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut c = controller(800.0);
        c.close().unwrap();
        let calls = c.host().calls;
        for op in &ops {
            prop_assert!(!apply(&mut c, op));
            prop_assert_eq!(c.phase(), Phase::Closed);
        }
        prop_assert_eq!(c.host().calls, calls);
    }
}
