//! String-keyed hash map and set built on separate chaining.
//!
//! Every slot of the table holds an optional [`Bucket`], a singly linked
//! chain of entries. Slots are allocated on first insertion and released
//! once a removal empties them. The table doubles its capacity and rehashes
//! every entry when an insertion would push the load factor past 0.75.
//!
//! Keys are strings; the hash function is only defined for them, so the
//! key type is fixed rather than generic.

mod macros;

pub mod bucket;
pub mod hash_map;
pub mod hash_set;

mod hash;

pub use bucket::{Bucket, IndexError, Node};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
