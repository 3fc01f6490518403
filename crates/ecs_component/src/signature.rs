//! Component signatures.
//!
//! A [`Signature`] is a fixed-width bitset: bit *i* is set when an entity
//! owns a component of the type registered at bit position *i*. Systems use
//! the same type to describe which components they require.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Backing integer of a [`Signature`]. Its bit width is the component ceiling.
pub type SignatureBits = u32;

/// Maximum number of component types that can ever be registered.
pub const MAX_COMPONENTS: usize = SignatureBits::BITS as usize;

/// The bit position a registered component type occupies in a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentType(u8);

impl ComponentType {
    /// Create a component type from a raw bit position.
    ///
    /// Returns `None` if `bit` does not fit in a [`Signature`].
    #[must_use]
    pub const fn new(bit: u8) -> Option<Self> {
        if (bit as usize) < MAX_COMPONENTS {
            Some(Self(bit))
        } else {
            None
        }
    }

    /// Returns the bit position.
    #[must_use]
    pub const fn bit(self) -> u8 {
        self.0
    }

    /// Returns a signature with only this type's bit set.
    #[must_use]
    pub const fn signature(self) -> Signature {
        Signature(1 << self.0)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// A set of component types, stored as one bit per registered type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(SignatureBits);

impl Signature {
    /// The signature with no bits set. As a system requirement it matches
    /// every entity.
    pub const EMPTY: Signature = Signature(0);

    /// Create a signature from its raw bits.
    #[must_use]
    pub const fn from_bits(bits: SignatureBits) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> SignatureBits {
        self.0
    }

    /// Returns this signature with `ty` added.
    #[must_use]
    pub const fn with(self, ty: ComponentType) -> Self {
        Self(self.0 | (1 << ty.0))
    }

    /// Returns this signature with `ty` removed.
    #[must_use]
    pub const fn without(self, ty: ComponentType) -> Self {
        Self(self.0 & !(1 << ty.0))
    }

    /// Set the bit for `ty`.
    pub fn set(&mut self, ty: ComponentType) {
        *self = self.with(ty);
    }

    /// Clear the bit for `ty`.
    pub fn clear(&mut self, ty: ComponentType) {
        *self = self.without(ty);
    }

    /// Clear every bit.
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Returns `true` if the bit for `ty` is set.
    #[must_use]
    pub const fn contains(self, ty: ComponentType) -> bool {
        self.0 & (1 << ty.0) != 0
    }

    /// Returns `true` if every bit of `required` is also set here.
    ///
    /// This is the membership test systems use:
    /// `entity & required == required`.
    #[must_use]
    pub const fn contains_all(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the component types present, lowest bit first.
    pub fn iter(self) -> impl Iterator<Item = ComponentType> {
        (0..MAX_COMPONENTS as u8)
            .map(ComponentType)
            .filter(move |ty| self.contains(*ty))
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Self) -> Self::Output {
        Signature(self.0 | rhs.0)
    }
}

impl BitOrAssign for Signature {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Self) -> Self::Output {
        Signature(self.0 & rhs.0)
    }
}

impl BitAndAssign for Signature {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl From<ComponentType> for Signature {
    fn from(ty: ComponentType) -> Self {
        ty.signature()
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = MAX_COMPONENTS)
    }
}
