// tests/property_supervisor.rs

use std::time::Duration;

use proptest::prelude::*;
use spinguard::supervise::{SupervisedTask, Supervisor};
use spinguard_test_utils::{RecordingTerminal, ScriptedHandle, TermOp};

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("building test runtime")
}

proptest! {
    // Any status, any number of polling cycles: the outcome mirrors the status
    // and the screen ends up erased with the cursor visible.
    #[test]
    fn outcome_and_display_hold_for_any_status_and_cycle_count(
        status in prop_oneof![Just(0), Just(1), Just(2), Just(127), Just(130), -1..=255i32],
        cycles in 0usize..200,
        interval_ms in 1u64..250,
    ) {
        let rt = paused_runtime();
        let term = RecordingTerminal::new();
        let handle = ScriptedHandle::running_for_polls(cycles, status);
        let observer = handle.clone();

        let outcome = rt.block_on(async {
            let mut sup = Supervisor::new(term.shared())
                .with_interval(Duration::from_millis(interval_ms));
            let mut task = SupervisedTask::new(handle);
            let outcome = sup.supervise(&mut task).await;
            // Collecting again must not reach the handle.
            prop_assert_eq!(task.collect(), outcome);
            Ok::<_, TestCaseError>(outcome)
        })?;

        prop_assert_eq!(outcome.status, status);
        prop_assert_eq!(outcome.success, status == 0);
        prop_assert_eq!(observer.reaps(), 1);
        prop_assert_eq!(term.draw_count(), cycles);
        prop_assert!(!term.indicator_visible());
        prop_assert!(term.cursor_visible());
        prop_assert_eq!(term.count(&TermOp::HideCursor), 1);
        prop_assert_eq!(term.count(&TermOp::ShowCursor), 1);
    }
}
