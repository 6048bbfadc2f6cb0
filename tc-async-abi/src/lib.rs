//! C entry points called by generated code.
//!
//! `tc_async_call` packages a call and starts its thread; `tc_async_return`
//! joins it and stores the result. The handle passed between them is an
//! opaque pointer owned by the generated code until it is returned here.

use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::slice;

use tc_async::{AsyncCall, NativeFn, Word, spawn_async};

/// Opaque handle for one outstanding call; points at a boxed `AsyncCall`.
pub type TcAsyncHandle = *mut c_void;

/// Absolute path to the bundled C header (`tc_async.h`).
pub fn header_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("include")
        .join("tc_async.h")
}

/// Start `f(args[0], .., args[nb_args - 1])` on a new thread.
///
/// The words are copied before this returns, so `args` may point into the
/// caller's frame. Failure to package or spawn aborts the process.
///
/// # Safety
/// `f` must be an `extern "C"` function taking exactly `nb_args` word-sized
/// parameters and returning a word. `args` must be valid for `nb_args` reads;
/// it may be null only when `nb_args` is zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tc_async_call(
    f: *const c_void,
    nb_args: usize,
    args: *const Word,
) -> TcAsyncHandle {
    let words: &[Word] = if nb_args == 0 {
        &[]
    } else {
        // SAFETY: the caller guarantees `args` covers `nb_args` words.
        unsafe { slice::from_raw_parts(args, nb_args) }
    };
    // SAFETY: the caller guarantees `f`'s signature matches `nb_args`.
    let target = unsafe { NativeFn::from_raw(f.cast()) };

    let call = spawn_async(target, words.iter().copied());
    log::trace!("tc_async_call issued call #{}", call.id());
    Box::into_raw(Box::new(call)).cast()
}

/// Wait for the call behind `handle` and write its result to `result`.
///
/// The handle is consumed; passing it again is undefined behaviour.
///
/// # Safety
/// `handle` must come from [`tc_async_call`] and not have been joined yet.
/// `result` must be valid for one word-sized write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tc_async_return(handle: TcAsyncHandle, result: *mut Word) {
    debug_assert!(!handle.is_null(), "tc_async_return on a null handle");
    debug_assert!(!result.is_null(), "tc_async_return into a null slot");

    // SAFETY: the handle was produced by `Box::into_raw` in `tc_async_call`
    // and ownership comes back exactly once.
    let call = unsafe { Box::from_raw(handle.cast::<AsyncCall<Word>>()) };
    let value = call.join();
    // SAFETY: the caller guarantees `result` is writable.
    unsafe { result.write(value) };
}
