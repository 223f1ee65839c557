//! 64-bit FNV-1 (multiply, then xor) over the serialized table bytes.

/// FNV-1 64-bit offset basis.
pub const FNV1_64_INIT: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV 64-bit prime.
pub const FNV_64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash `data` with FNV-1 (not FNV-1a).
///
/// ```
/// use perceptual::fnv1_64;
///
/// assert_eq!(fnv1_64(b""), 0xcbf2_9ce4_8422_2325);
/// assert_eq!(fnv1_64(b"a"), 0xaf63_bd4c_8601_b7be);
/// ```
#[inline]
pub fn fnv1_64(data: &[u8]) -> u64 {
    data.iter().fold(FNV1_64_INIT, |hash, &byte| {
        hash.wrapping_mul(FNV_64_PRIME) ^ u64::from(byte)
    })
}
