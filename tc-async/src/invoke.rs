//! The calling-convention adapter.
//!
//! Targets are plain `extern "C"` functions taking `n` machine words and
//! returning one. Invoking one means reinterpreting its address as the
//! function-pointer type of the right arity and calling it; the compiler then
//! places each word in the register or stack slot the C ABI assigns to that
//! parameter position. This is the only module that performs the
//! reinterpretation.

#![allow(unsafe_code)]

use std::fmt;
use std::mem;

use crate::word::Word;

/// Reference to an `extern "C"` target taking only machine words.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NativeFn {
    addr: *const (),
    arity: Option<usize>,
}

// SAFETY: a code address has no thread affinity; targets are shared freely.
unsafe impl Send for NativeFn {}
unsafe impl Sync for NativeFn {}

impl NativeFn {
    /// Wrap a typed function pointer, recording its declared arity.
    pub fn of<S: NativeSignature>(f: S) -> Self {
        NativeFn {
            addr: f.code_addr(),
            arity: Some(S::ARITY),
        }
    }

    /// Wrap a bare code address handed over by emitted code.
    ///
    /// # Safety
    /// `addr` must be an `extern "C"` function whose parameters are all
    /// word-sized and which returns a word. Every call packaged against it must
    /// supply exactly as many arguments as it declares.
    pub unsafe fn from_raw(addr: *const ()) -> Self {
        NativeFn { addr, arity: None }
    }

    /// Like [`NativeFn::from_raw`], but packaging checks the argument count.
    ///
    /// # Safety
    /// Same as [`NativeFn::from_raw`], and `arity` must be the declared count.
    pub unsafe fn from_raw_with_arity(addr: *const (), arity: usize) -> Self {
        NativeFn {
            addr,
            arity: Some(arity),
        }
    }

    pub fn addr(&self) -> *const () {
        self.addr
    }

    /// Declared parameter count, when known.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Call the target with `args` in declaration order.
    ///
    /// # Safety
    /// `args.len()` must equal the target's real parameter count and must not
    /// exceed [`MAX_ARITY`]. `PackagedCall` establishes both.
    pub(crate) unsafe fn invoke(&self, args: &[Word]) -> Word {
        // SAFETY: forwarded from the caller.
        unsafe { dispatch(self.addr, args) }
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("addr", &self.addr)
            .field("arity", &self.arity)
            .finish()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Scalar types sharing `Word`'s representation.
pub trait WordRepr: Copy + sealed::Sealed {}

impl sealed::Sealed for Word {}
impl WordRepr for Word {}
impl sealed::Sealed for usize {}
impl WordRepr for usize {}

/// Function-pointer types that can be wrapped by [`NativeFn::of`].
///
/// Implemented for `extern "C" fn(W, ..) -> W` with `W` = [`Word`] or `usize`,
/// up to [`MAX_ARITY`] parameters.
pub trait NativeSignature: Copy + sealed::Sealed {
    const ARITY: usize;

    fn code_addr(self) -> *const ();
}

// One row per supported arity drives the typed signatures, the dispatch
// table, and MAX_ARITY, so the three cannot disagree.
macro_rules! arity_table {
    (@slot $idx:literal $word:ty) => { $word };
    ($($arity:literal => ($($idx:literal)*)),* $(,)?) => {
        const ARITIES: &[usize] = &[$($arity),*];

        /// Largest argument count a packaged call may carry.
        pub const MAX_ARITY: usize = {
            let mut max = 0;
            let mut i = 0;
            while i < ARITIES.len() {
                if ARITIES[i] > max {
                    max = ARITIES[i];
                }
                i += 1;
            }
            max
        };

        $(
            impl<W: WordRepr> sealed::Sealed
                for extern "C" fn($(arity_table!(@slot $idx W)),*) -> W {}

            impl<W: WordRepr> NativeSignature
                for extern "C" fn($(arity_table!(@slot $idx W)),*) -> W
            {
                const ARITY: usize = $arity;

                fn code_addr(self) -> *const () {
                    self as *const ()
                }
            }
        )*

        /// # Safety
        /// The function at `addr` must take exactly `a.len()` word parameters
        /// and return a word.
        unsafe fn dispatch(addr: *const (), a: &[Word]) -> Word {
            match a.len() {
                $(
                    $arity => {
                        // SAFETY: the caller guarantees the signature matches
                        // this arity, so the reinterpreted pointer type is the
                        // function's real C signature.
                        let f: extern "C" fn($(arity_table!(@slot $idx Word)),*) -> Word =
                            unsafe { mem::transmute(addr) };
                        f($(a[$idx]),*)
                    }
                )*
                n => unreachable!("packaged call with {n} arguments exceeds MAX_ARITY"),
            }
        }
    };
}

arity_table! {
    0 => (),
    1 => (0),
    2 => (0 1),
    3 => (0 1 2),
    4 => (0 1 2 3),
    5 => (0 1 2 3 4),
    6 => (0 1 2 3 4 5),
    7 => (0 1 2 3 4 5 6),
    8 => (0 1 2 3 4 5 6 7),
    9 => (0 1 2 3 4 5 6 7 8),
    10 => (0 1 2 3 4 5 6 7 8 9),
    11 => (0 1 2 3 4 5 6 7 8 9 10),
    12 => (0 1 2 3 4 5 6 7 8 9 10 11),
    13 => (0 1 2 3 4 5 6 7 8 9 10 11 12),
    14 => (0 1 2 3 4 5 6 7 8 9 10 11 12 13),
    15 => (0 1 2 3 4 5 6 7 8 9 10 11 12 13 14),
    16 => (0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15),
}
