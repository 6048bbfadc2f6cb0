use crate::error::{AsyncCallError, Result};
use crate::invoke::{MAX_ARITY, NativeFn};
use crate::stats;
use crate::word::Word;

/// One deferred invocation: a target and the words to call it with.
///
/// Built on the spawning thread, moved into the executing thread, and dropped
/// there once the target returns. It is deliberately not `Clone`, so exactly
/// one release happens per call.
#[derive(Debug)]
pub struct PackagedCall {
    target: NativeFn,
    args: Box<[Word]>,
}

impl PackagedCall {
    /// Package `args` for `target`, preserving their order.
    pub fn new<I>(target: NativeFn, args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Word>,
    {
        let args: Box<[Word]> = args.into_iter().map(Into::into).collect();
        if args.len() > MAX_ARITY {
            return Err(AsyncCallError::arity_limit(args.len()));
        }
        if let Some(expected) = target.arity() {
            if expected != args.len() {
                return Err(AsyncCallError::ArityMismatch {
                    expected,
                    got: args.len(),
                });
            }
        }

        stats::record_packaged();
        Ok(PackagedCall { target, args })
    }

    pub fn target(&self) -> NativeFn {
        self.target
    }

    pub fn argument_count(&self) -> usize {
        self.args.len()
    }

    pub fn arguments(&self) -> &[Word] {
        &self.args
    }

    /// Run the target, release the package, and yield the target's result.
    #[allow(unsafe_code)]
    pub(crate) fn execute(self) -> Word {
        // SAFETY: `new` bounded the count by MAX_ARITY and matched it against
        // the declared arity where one is known; raw targets carry the
        // emitter's guarantee from `NativeFn::from_raw`.
        let result = unsafe { self.target.invoke(&self.args) };
        drop(self);
        result
    }
}

impl Drop for PackagedCall {
    fn drop(&mut self) {
        log::trace!(
            "releasing packaged call to {:p} ({} args)",
            self.target.addr(),
            self.args.len()
        );
        stats::record_released();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn add(a: usize, b: usize) -> usize {
        a + b
    }

    extern "C" fn nothing() -> Word {
        Word::ZERO
    }

    #[test]
    fn arguments_keep_caller_order() {
        let f = NativeFn::of(add as extern "C" fn(usize, usize) -> usize);
        let call = PackagedCall::new(f, [3usize, 4]).expect("package");
        assert_eq!(call.argument_count(), 2);
        assert_eq!(call.arguments(), &[Word::new(3), Word::new(4)]);
        assert_eq!(call.execute(), Word::new(7));
    }

    #[test]
    fn zero_arguments_package_normally() {
        let f = NativeFn::of(nothing as extern "C" fn() -> Word);
        let call = PackagedCall::new(f, Vec::<Word>::new()).expect("package");
        assert_eq!(call.argument_count(), 0);
        assert!(call.execute().is_zero());
    }

    #[test]
    fn declared_arity_must_match() {
        let f = NativeFn::of(add as extern "C" fn(usize, usize) -> usize);
        let err = PackagedCall::new(f, [1usize]).expect_err("one argument short");
        assert!(matches!(
            err,
            AsyncCallError::ArityMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    #[allow(unsafe_code)]
    fn too_many_arguments_rejected_even_for_raw_targets() {
        let f = unsafe { NativeFn::from_raw((nothing as extern "C" fn() -> Word) as *const ()) };
        let err = PackagedCall::new(f, 0..(MAX_ARITY + 1)).expect_err("over the limit");
        assert!(matches!(err, AsyncCallError::ArityLimit { .. }));
    }
}
