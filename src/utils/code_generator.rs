//! Short code generation.
//!
//! Codes are 7 characters drawn uniformly from a 64-symbol URL-safe alphabet using
//! the operating system CSPRNG. The generator never checks uniqueness; callers
//! insert and retry on conflict.

#[cfg(test)]
use mockall::automock;

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 7;

/// URL-safe alphabet. Exactly 64 symbols, so `byte & 63` is an unbiased index.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of candidate short codes.
#[cfg_attr(test, automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a fresh candidate code.
    fn generate(&self) -> String;
}

/// Cryptographically secure random code generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random 7-character short code.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    buffer
        .iter()
        .map(|b| ALPHABET[(b & 63) as usize] as char)
        .collect()
}

/// Returns `true` if `code` could have been produced by [`generate_code`].
///
/// Used by the redirect path to reject obviously foreign paths without a store
/// round-trip.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
