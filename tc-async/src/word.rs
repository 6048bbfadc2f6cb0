use std::fmt;

/// A machine word as seen by emitted code.
///
/// Every argument and every result crossing an asynchronous call is reduced
/// to one of these by the code generator. The representation is exactly a
/// `usize`, so a target declared with `usize` parameters accepts `Word`s.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(usize);

impl Word {
    pub const ZERO: Word = Word(0);

    pub const fn new(raw: usize) -> Self {
        Word(raw)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }

    pub const fn as_isize(self) -> isize {
        self.0 as isize
    }

    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:#x})", self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<usize> for Word {
    fn from(v: usize) -> Self {
        Word(v)
    }
}

impl From<isize> for Word {
    fn from(v: isize) -> Self {
        Word(v as usize)
    }
}

impl From<u32> for Word {
    fn from(v: u32) -> Self {
        Word(v as usize)
    }
}

// Sign-extended, matching how a 32-bit `int` is widened into an argument slot.
impl From<i32> for Word {
    fn from(v: i32) -> Self {
        Word(v as isize as usize)
    }
}

impl From<bool> for Word {
    fn from(v: bool) -> Self {
        Word(v as usize)
    }
}

impl<T> From<*const T> for Word {
    fn from(p: *const T) -> Self {
        Word(p as usize)
    }
}

impl<T> From<*mut T> for Word {
    fn from(p: *mut T) -> Self {
        Word(p as usize)
    }
}

impl From<Word> for usize {
    fn from(w: Word) -> Self {
        w.0
    }
}
