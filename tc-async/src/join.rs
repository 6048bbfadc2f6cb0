use std::panic;
use std::thread;

use crate::stats;
use crate::word::Word;

/// The pending result of an asynchronous call.
///
/// Returned immediately by the spawn functions; the only way to observe the
/// result is to consume it with [`AsyncCall::join`], so a call can be joined
/// at most once. Dropping it without joining detaches the thread.
#[must_use = "an asynchronous call that is never joined leaks its result"]
#[derive(Debug)]
pub struct AsyncCall<T = Word> {
    id: u64,
    handle: thread::JoinHandle<T>,
}

impl<T> AsyncCall<T> {
    pub(crate) fn new(id: u64, handle: thread::JoinHandle<T>) -> Self {
        AsyncCall { id, handle }
    }

    /// Process-unique sequence number assigned at spawn time.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn thread(&self) -> &thread::Thread {
        self.handle.thread()
    }

    /// Whether the target has returned. Never blocks.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the call's thread has terminated and return its result.
    ///
    /// A panic inside the target is re-raised here unchanged.
    pub fn join(self) -> T {
        let id = self.id;
        match self.handle.join() {
            Ok(value) => {
                stats::record_joined();
                log::debug!("joined asynchronous call #{id}");
                value
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

#[cfg(feature = "tokio")]
impl<T: Send + 'static> AsyncCall<T> {
    /// Join from async code without blocking a runtime worker.
    pub async fn wait(self) -> T {
        let id = self.id;
        match tokio::task::spawn_blocking(move || self.join()).await {
            Ok(value) => value,
            Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
            Err(err) => panic!("asynchronous call #{id} abandoned by runtime: {err}"),
        }
    }
}

/// Block on `call` and store its result in `slot`.
pub fn join_async(call: AsyncCall<Word>, slot: &mut Word) {
    *slot = call.join();
}

/// Join every call in iteration order.
pub fn join_all<T, I>(calls: I) -> Vec<T>
where
    I: IntoIterator<Item = AsyncCall<T>>,
{
    calls.into_iter().map(AsyncCall::join).collect()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::spawn::spawn;

    #[test]
    fn join_yields_closure_result() {
        let call = spawn(|| Word::new(99));
        let mut slot = Word::ZERO;
        join_async(call, &mut slot);
        assert_eq!(slot, Word::new(99));
    }

    #[test]
    fn join_waits_for_termination() {
        let started = Instant::now();
        let call = spawn(|| {
            thread::sleep(Duration::from_millis(50));
            7u32
        });
        assert_eq!(call.join(), 7);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn is_finished_turns_true_after_return() {
        let call = spawn(|| ());
        while !call.is_finished() {
            thread::yield_now();
        }
        call.join();
    }

    #[test]
    fn panics_cross_the_join() {
        let call = spawn(|| -> Word { panic!("target failed") });
        let caught = panic::catch_unwind(panic::AssertUnwindSafe(|| call.join()))
            .expect_err("panic should propagate");
        assert_eq!(caught.downcast_ref::<&str>(), Some(&"target failed"));
    }

    #[test]
    fn join_all_preserves_spawn_order() {
        let calls: Vec<_> = (0..10usize).map(|i| spawn(move || i * 10)).collect();
        assert_eq!(join_all(calls), (0..10).map(|i| i * 10).collect::<Vec<_>>());
    }
}
