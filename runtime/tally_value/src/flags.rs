//! Variable type bits and condition flags.
//!
//! `VarType` is computed by [`classify`](crate::classify) from the tag
//! byte; `CondFlags` is the outcome word every formatting and list verb
//! hands back to its caller.

use bitflags::bitflags;

bitflags! {
    /// Classification bits of a tagged value.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct VarType: u16 {
        /// 32-bit integer.
        const INT = 0x1;
        /// 64-bit float with digit widths.
        const FLOAT = 0x2;
        /// Fixed-decimal form.
        const NUM = 0x4;
        /// Numeric literal.
        const NUMLIT = 0x8;
        /// Short or long text.
        const CHAR = 0x10;
        /// Character literal.
        const CHARLIT = 0x20;
        /// Null state, combined with one of the bits above.
        const NULL = 0x80;
        const LIST = 0x100;
        const ARRAY = 0x200;
    }
}

impl VarType {
    /// Numeric variables (excludes literals).
    pub const NUMVAR: Self = Self::from_bits_truncate(
        Self::INT.bits() | Self::FLOAT.bits() | Self::NUM.bits(),
    );
    /// Every numeric variant, literals included.
    pub const NUMERIC: Self =
        Self::from_bits_truncate(Self::NUMVAR.bits() | Self::NUMLIT.bits());
    /// Every character variant, literals included.
    pub const CHARACTER: Self =
        Self::from_bits_truncate(Self::CHAR.bits() | Self::CHARLIT.bits());
    pub const LITERAL: Self =
        Self::from_bits_truncate(Self::NUMLIT.bits() | Self::CHARLIT.bits());

    /// Int, float, or null: the variants that need a form built before
    /// their digits can be read as text.
    pub const NEEDS_FORM: Self = Self::from_bits_truncate(
        Self::INT.bits() | Self::FLOAT.bits() | Self::NULL.bits(),
    );

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.intersects(Self::NUMERIC)
    }

    #[inline]
    pub const fn is_numvar(self) -> bool {
        self.intersects(Self::NUMVAR)
    }

    #[inline]
    pub const fn is_character(self) -> bool {
        self.intersects(Self::CHARACTER)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.contains(Self::NULL)
    }
}

bitflags! {
    /// Outcome bits of a formatting, list, or SQL verb.
    ///
    /// Every operation returns the bits it sets. Operations only define a
    /// subset of the word; a caller chaining several verbs composes the
    /// outcomes with [`CondFlags::merge`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CondFlags: u8 {
        /// End of sequence: source or destination ran out.
        const EOS = 0x1;
        const EQUAL = 0x2;
        const LESS = 0x4;
        /// Overflow, missing data, or malformed operand.
        const OVER = 0x8;
    }
}

impl CondFlags {
    /// Replace the bits named in `touched` with those of `outcome`,
    /// keeping every other bit of `self`.
    #[inline]
    #[must_use]
    pub const fn merge(self, touched: Self, outcome: Self) -> Self {
        self.difference(touched).union(outcome.intersection(touched))
    }
}
