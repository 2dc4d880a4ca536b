/// 32-bit boolean used for success flags; any nonzero value is true.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bool32(pub u32);

impl Bool32 {
    pub const FALSE: Self = Self(0);
    pub const TRUE: Self = Self(1);

    #[inline]
    pub const fn get(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Bool32 {
    #[inline]
    fn from(value: bool) -> Self {
        if value { Self::TRUE } else { Self::FALSE }
    }
}

impl From<Bool32> for bool {
    #[inline]
    fn from(value: Bool32) -> Self {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonzero_is_true() {
        assert!(Bool32(7).get());
        assert!(!Bool32::FALSE.get());
        assert_eq!(Bool32::from(true), Bool32::TRUE);
    }
}
