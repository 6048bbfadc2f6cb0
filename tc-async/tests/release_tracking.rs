// The counters are process-wide, so this binary holds a single test.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use tc_async::{NativeFn, PackagedCall, Word, join_all, spawn_async, stats};

static GATE: AtomicBool = AtomicBool::new(false);
static ENTERED: AtomicUsize = AtomicUsize::new(0);

extern "C" fn gated_increment(v: usize) -> usize {
    ENTERED.fetch_add(1, Ordering::SeqCst);
    while !GATE.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }
    v + 1
}

fn target() -> NativeFn {
    NativeFn::of(gated_increment as extern "C" fn(usize) -> usize)
}

#[test]
fn packages_are_released_exactly_once_after_their_target_returns() {
    const IN_FLIGHT: usize = 16;
    const CYCLES: usize = 50;

    let before = stats::snapshot();

    let calls: Vec<_> = (0..IN_FLIGHT).map(|i| spawn_async(target(), [i])).collect();
    while ENTERED.load(Ordering::SeqCst) < IN_FLIGHT {
        thread::yield_now();
    }

    // Every target is running and blocked: nothing may be released yet.
    let running = stats::snapshot();
    assert_eq!(running.packaged - before.packaged, IN_FLIGHT as u64);
    assert_eq!(running.released, before.released, "package freed before its call returned");
    assert_eq!(running.spawned - before.spawned, IN_FLIGHT as u64);

    GATE.store(true, Ordering::SeqCst);
    let results = join_all(calls);
    assert_eq!(
        results,
        (0..IN_FLIGHT).map(|i| Word::new(i + 1)).collect::<Vec<_>>()
    );

    let joined = stats::snapshot();
    assert_eq!(joined.released - before.released, IN_FLIGHT as u64);
    assert_eq!(joined.joined - before.joined, IN_FLIGHT as u64);
    assert_eq!(joined.live_packages(), before.live_packages());

    // Repeated spawn/join cycles neither leak nor double-release.
    for round in 0..CYCLES {
        let call = spawn_async(target(), [round]);
        assert_eq!(call.join(), Word::new(round + 1));
    }

    // A rejected package is never counted, so it is never released either.
    assert!(PackagedCall::new(target(), [1usize, 2]).is_err());

    let after = stats::snapshot();
    let total = (IN_FLIGHT + CYCLES) as u64;
    assert_eq!(after.packaged - before.packaged, total);
    assert_eq!(after.released - before.released, total);
    assert_eq!(after.outstanding(), before.outstanding());
}
