use core::fmt;
use core::num::NonZeroU32;

use crate::{CoreError, CoreResult};

/// Identifier of a unit within a pass sequence.
///
/// - assigned by the editing session, never reused within a document
/// - `NonZero` so the wire value `0` is rejected on load and `Option<UnitId>`
///   stays the size of a `u32`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(NonZeroU32);

impl UnitId {
    /// The first ID handed out in a fresh sequence.
    pub const fn first() -> Self {
        Self(NonZeroU32::MIN)
    }

    /// Wrap a raw wire value. Zero is not a valid ID.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The ID following this one.
    pub fn next(self) -> CoreResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(CoreError::IdOverflow { last: self.get() })
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.get())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(UnitId::new(0).is_none());
        assert_eq!(UnitId::new(7).map(UnitId::get), Some(7));
    }

    #[test]
    fn next_is_monotonic() {
        let a = UnitId::first();
        let b = a.next().unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert!(b > a);
    }

    #[test]
    fn next_overflow_is_an_error() {
        let last = UnitId::new(u32::MAX).unwrap();
        let err = last.next().unwrap_err();
        assert!(format!("{err}").contains("exhausted"));
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<UnitId>(),
            core::mem::size_of::<Option<UnitId>>()
        );
    }
}
