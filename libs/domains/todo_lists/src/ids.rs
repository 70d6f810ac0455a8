//! Opaque identifiers for lists and items: 8 random bytes as 16 lowercase hex chars.

use argon2::password_hash::rand_core::{OsRng, RngCore};

const HEX_ID_LEN: usize = 16;

/// Generate a fresh random id such as `"9f86d081884c7d65"`.
pub fn random_hex_id() -> String {
    format!("{:016x}", OsRng.next_u64())
}

/// Numeric value of a list id, or `None` if `id` was not produced by
/// [`random_hex_id`].
pub fn parse_hex_id(id: &str) -> Option<u64> {
    let lower_hex = |b: u8| b.is_ascii_digit() || (b'a'..=b'f').contains(&b);
    if id.len() != HEX_ID_LEN || !id.bytes().all(lower_hex) {
        return None;
    }
    u64::from_str_radix(id, 16).ok()
}

/// Inverse of [`parse_hex_id`].
pub fn format_hex_id(value: u64) -> String {
    format!("{:016x}", value)
}
