//! Vendor invitation tokens.
//!
//! Tokens are short base-36 strings from a general-purpose RNG. They are
//! neither unique nor collision resistant: invites are keyed by their own
//! id and the token column carries no uniqueness constraint.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Characters used in invite tokens
pub const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// Length of generated invite tokens
pub const TOKEN_LENGTH: usize = 6;
/// How long an invite stays valid
pub const INVITE_VALIDITY_DAYS: i64 = 7;

/// Generate a token of `len` base-36 characters
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Token for a new invite
pub fn new_invite_token() -> String {
    generate_token(&mut rand::thread_rng(), TOKEN_LENGTH)
}

/// Expiry of an invite issued at `issued_at`
pub fn invite_expiry(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::days(INVITE_VALIDITY_DAYS)
}

/// Birthday-bound probability that at least two of `count` tokens of length
/// `len` are equal
pub fn collision_probability(count: u64, len: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }

    let space = (TOKEN_ALPHABET.len() as f64).powi(len as i32);
    if count as f64 > space {
        return 1.0;
    }

    // 1 - prod_{i<count} (1 - i/space), computed in log space
    let log_unique: f64 = (1..count).map(|i| (-(i as f64) / space).ln_1p()).sum();
    -log_unique.exp_m1()
}
