// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity identity types.

use core::fmt;

/// A handle to an object in a [`SceneStore`](super::SceneStore) or any other
/// [`Document`](super::Document).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after an object is deleted and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

/// A handle to a material, with the same stale-detection scheme as [`ObjectId`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

macro_rules! generational {
    ($ty:ident, $label:literal) => {
        impl $ty {
            /// Builds a handle from its raw parts.
            ///
            /// Hosts that keep their own entity tables use this to mint ids;
            /// lookups through a [`Document`](super::Document) still reject
            /// handles whose generation no longer matches.
            #[inline]
            #[must_use]
            pub const fn from_raw(idx: u32, generation: u32) -> Self {
                Self { idx, generation }
            }

            /// Returns the raw slot index (for diagnostics only).
            #[inline]
            #[must_use]
            pub const fn index(self) -> u32 {
                self.idx
            }

            /// Returns the generation counter.
            #[inline]
            #[must_use]
            pub const fn generation(self) -> u32 {
                self.generation
            }

            /// Packs the handle into a single dirty-tracker key.
            #[inline]
            #[must_use]
            pub(crate) const fn key(self) -> u64 {
                ((self.generation as u64) << 32) | self.idx as u64
            }

            #[inline]
            #[must_use]
            #[expect(
                clippy::cast_possible_truncation,
                reason = "the key was packed from two u32 halves"
            )]
            pub(crate) const fn from_key(key: u64) -> Self {
                Self {
                    idx: key as u32,
                    generation: (key >> 32) as u32,
                }
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({}@gen{})"), self.idx, self.generation)
            }
        }
    };
}

generational!(ObjectId, "ObjectId");
generational!(MaterialId, "MaterialId");

/// A collection in the document's collection graph.
///
/// Collections are never recycled during a session, so a plain index is
/// enough to identify one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionId(pub u32);

impl fmt::Debug for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionId({})", self.0)
    }
}

/// Identifies the active scene. A change of value between passes means the
/// user switched scenes or loaded another file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SceneId(pub u64);

impl fmt::Debug for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneId({})", self.0)
    }
}

/// Identifies one editor area (viewport instance) on screen.
///
/// Hosts assign these; core treats them as opaque and only compares them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AreaId(pub u64);

impl fmt::Debug for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AreaId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_both_halves() {
        let id = ObjectId::from_raw(7, 3);
        assert_eq!(ObjectId::from_key(id.key()), id, "packed key must unpack");
        assert_ne!(
            ObjectId::from_raw(7, 4).key(),
            id.key(),
            "generation must take part in the key"
        );
    }

    #[test]
    fn debug_shows_generation() {
        let id = MaterialId::from_raw(2, 5);
        assert_eq!(format!("{id:?}"), "MaterialId(2@gen5)");
    }
}
