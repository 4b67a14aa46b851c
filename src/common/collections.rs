//! Fast-hash collection aliases used throughout the crate in place of the
//! stdlib's SipHash-backed defaults — window/workspace lookups are on the
//! hot path of every event and action.

use rustc_hash::FxBuildHasher;

pub type HashMap<K, V> = std::collections::HashMap<K, V, FxBuildHasher>;
pub type HashSet<T> = std::collections::HashSet<T, FxBuildHasher>;
pub type BTreeMap<K, V> = std::collections::BTreeMap<K, V>;
