//! Capacity-dependent string hashing.

/// Maps `key` to a slot index in `[0, capacity)`.
///
/// Polynomial rolling hash over the key's UTF-16 code units, reduced modulo
/// `capacity` after every unit. Because the modulus is the current capacity,
/// the same key lands in a different slot once the table has grown, which is
/// why growth rehashes every stored key.
pub(crate) fn bucket_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "cannot hash into an empty slot array");

    let capacity = capacity as u64;
    let mut hash = 0u64;
    for unit in key.encode_utf16() {
        hash = (hash * 31 + u64::from(unit)) % capacity;
    }

    hash as usize
}
