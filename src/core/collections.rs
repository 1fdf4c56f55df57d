//! Collection aliases used throughout the crate.
//!
//! Hash-based containers use `rustc_hash`'s `FxHasher`: keys are internal
//! (slotmap keys, coordinates of inserted points), so DoS resistance is not a
//! concern and the hasher is deterministic across runs.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Fast non-cryptographic `HashMap`.
///
/// ⚠️ Not DoS-resistant; use only with trusted keys.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(1, 2);
/// assert_eq!(map.get(&1), Some(&2));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Fast non-cryptographic `HashSet`.
pub type FastHashSet<T> = FxHashSet<T>;

/// Stack-first buffer that spills to the heap past `N` elements.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Typical number of triangles removed by one insertion.
///
/// Bowyer–Watson cavities in uniformly distributed input average about four
/// triangles; eight keeps most cavities on the stack.
pub const CAVITY_INLINE_CAPACITY: usize = 8;
