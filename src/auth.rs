//! Password hashing for sign-up credentials.
//!
//! PBKDF2-HMAC-SHA256 with a random per-credential salt. The stored
//! string embeds the iteration count so old hashes stay verifiable if
//! the default is raised later:
//!
//! `pbkdf2-sha256$<iterations>$<salt base64>$<hash base64>`

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[cfg(not(test))]
pub const PBKDF2_ITERATIONS: u32 = 600_000;
// Keep test runs fast; the iteration count is embedded in the hash string.
#[cfg(test)]
pub const PBKDF2_ITERATIONS: u32 = 1_000;

pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

const SCHEME: &str = "pbkdf2-sha256";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed password hash")]
    MalformedHash,
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let hash = derive(password, &salt, PBKDF2_ITERATIONS);
    format!(
        "{SCHEME}${}${}${}",
        PBKDF2_ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(hash),
    )
}

/// Verify a password against a stored hash string in constant time.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let mut parts = stored.split('$');
    let scheme = parts.next().ok_or(AuthError::MalformedHash)?;
    let iterations: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or(AuthError::MalformedHash)?;
    let salt = parts
        .next()
        .and_then(|s| URL_SAFE_NO_PAD.decode(s).ok())
        .ok_or(AuthError::MalformedHash)?;
    let expected = parts
        .next()
        .and_then(|s| URL_SAFE_NO_PAD.decode(s).ok())
        .ok_or(AuthError::MalformedHash)?;

    if scheme != SCHEME || parts.next().is_some() || expected.len() != HASH_LENGTH {
        return Err(AuthError::MalformedHash);
    }

    let actual = derive(password, &salt, iterations);
    Ok(actual.ct_eq(&expected).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password("ward-secret");
        assert!(verify_password("ward-secret", &stored).unwrap());
    }

    #[test]
    fn wrong_password_rejected() {
        let stored = hash_password("ward-secret");
        assert!(!verify_password("ward-Secret", &stored).unwrap());
        assert!(!verify_password("", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("ward-secret");
        let b = hash_password("ward-secret");
        assert_ne!(a, b);
        assert!(verify_password("ward-secret", &a).unwrap());
        assert!(verify_password("ward-secret", &b).unwrap());
    }

    #[test]
    fn hash_embeds_scheme_and_iterations() {
        let stored = hash_password("x");
        assert!(stored.starts_with("pbkdf2-sha256$"));
        assert!(stored.contains(&format!("${PBKDF2_ITERATIONS}$")));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
        assert!(verify_password("x", "pbkdf2-sha256$abc$zz$zz").is_err());
        assert!(verify_password("x", "pbkdf2-sha256$1000$AAAA").is_err());
    }
}
