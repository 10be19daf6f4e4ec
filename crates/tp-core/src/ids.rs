//! Typed indices into the graph's vertex, edge and pattern tables.
//!
//! Each id wraps a `u32` position in the owning `Vec` of a built graph.  The
//! field is public so builders can mint ids, but lookups should go through
//! [`index`](VertexId::index).  `u32::MAX` is reserved as a sentinel for
//! "no such element" (e.g. unfilled CSR slots).

use std::fmt;

macro_rules! graph_id {
    ($(#[$attr:meta])* $name:ident, $prefix:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the owning table.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Id of table position `i`, or `None` if `i` does not fit below
            /// the sentinel.
            #[inline]
            pub fn from_index(i: usize) -> Option<$name> {
                u32::try_from(i).ok().filter(|&n| n != u32::MAX).map($name)
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($prefix, "{}"), self.0)
                } else {
                    f.write_str(concat!($prefix, "?"))
                }
            }
        }
    };
}

graph_id! {
    /// A graph vertex: intersection, stop, pattern stop or rental station.
    VertexId, "v"
}

graph_id! {
    /// A directed graph edge.
    EdgeId, "e"
}

graph_id! {
    /// A transit trip pattern (an ordered stop sequence with a timetable).
    PatternId, "p"
}
