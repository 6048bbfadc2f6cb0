use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::config::SpawnConfig;
use crate::error::{AsyncCallError, Result, fatal};
use crate::invoke::NativeFn;
use crate::join::AsyncCall;
use crate::packaged::PackagedCall;
use crate::stats;
use crate::word::Word;

static NEXT_CALL_ID: AtomicU64 = AtomicU64::new(1);

fn next_call_id() -> u64 {
    NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Issues asynchronous calls, one OS thread each.
#[derive(Clone, Debug, Default)]
pub struct Spawner {
    config: SpawnConfig,
}

impl Spawner {
    pub fn new(config: SpawnConfig) -> Result<Self> {
        config.validate()?;
        Ok(Spawner { config })
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    fn builder(&self, id: u64) -> thread::Builder {
        let builder = thread::Builder::new().name(self.config.thread_name(id));
        match self.config.stack_size {
            Some(bytes) => builder.stack_size(bytes),
            None => builder,
        }
    }

    /// Move `call` onto a new thread and return without waiting for it.
    ///
    /// If the thread cannot be created the package is released here and the
    /// error is returned.
    pub fn try_spawn_call(&self, call: PackagedCall) -> Result<AsyncCall<Word>> {
        let id = next_call_id();
        log::debug!(
            "spawning asynchronous call #{id} to {:p} with {} args",
            call.target().addr(),
            call.argument_count()
        );

        let handle = self
            .builder(id)
            .spawn(move || call.execute())
            .map_err(|source| AsyncCallError::Spawn { id, source })?;

        stats::record_spawned();
        Ok(AsyncCall::new(id, handle))
    }

    /// Run a Rust closure on a new thread with the same lifecycle.
    pub fn try_spawn<F, T>(&self, f: F) -> Result<AsyncCall<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let id = next_call_id();
        log::debug!("spawning asynchronous closure #{id}");

        let handle = self
            .builder(id)
            .spawn(f)
            .map_err(|source| AsyncCallError::Spawn { id, source })?;

        stats::record_spawned();
        Ok(AsyncCall::new(id, handle))
    }

    /// Package and spawn; any failure terminates the process.
    pub fn spawn_async<I>(&self, target: NativeFn, args: I) -> AsyncCall<Word>
    where
        I: IntoIterator,
        I::Item: Into<Word>,
    {
        match PackagedCall::new(target, args).and_then(|call| self.try_spawn_call(call)) {
            Ok(call) => call,
            Err(err) => fatal(err),
        }
    }

    pub fn spawn<F, T>(&self, f: F) -> AsyncCall<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.try_spawn(f).unwrap_or_else(|err| fatal(err))
    }
}

/// Call `target(args..)` on a new thread; join the returned handle for the
/// result.
///
/// Arguments are copied in the order given. Packaging or thread-creation
/// failure is fatal.
pub fn spawn_async<I>(target: NativeFn, args: I) -> AsyncCall<Word>
where
    I: IntoIterator,
    I::Item: Into<Word>,
{
    Spawner::default().spawn_async(target, args)
}

/// Closure counterpart of [`spawn_async`].
pub fn spawn<F, T>(f: F) -> AsyncCall<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Spawner::default().spawn(f)
}
