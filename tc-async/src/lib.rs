#![deny(unsafe_code)]

//! Runtime support for compiler-emitted asynchronous calls.
//!
//! An emitted `async f(a, b)` becomes [`spawn_async`]: the target and its
//! word-sized arguments are packaged, moved onto a fresh OS thread, and invoked
//! there through the platform C calling convention. The caller later blocks in
//! [`join_async`] (or [`AsyncCall::join`]) to collect the single word result.
//!
//! One thread per call, no pooling, no cancellation.

pub mod config;
pub mod error;
pub mod invoke;
pub mod join;
pub mod packaged;
pub mod spawn;
pub mod stats;
pub mod word;

pub use config::SpawnConfig;
pub use error::{AsyncCallError, Result};
pub use invoke::{MAX_ARITY, NativeFn, NativeSignature};
pub use join::{AsyncCall, join_all, join_async};
pub use packaged::PackagedCall;
pub use spawn::{Spawner, spawn, spawn_async};
pub use word::Word;
