//! Password hashing in the web application's own credential format:
//! `pbkdf2:sha256:<iterations>$<salt>$<hex digest>`.

use crate::error::BootError;
use rand::{Rng, distributions::Alphanumeric};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();
    hash_with(password, &salt, PBKDF2_ITERATIONS)
}

fn hash_with(password: &str, salt: &str, iterations: u32) -> String {
    let digest = derive(password, salt, iterations);
    format!("pbkdf2:sha256:{iterations}${salt}${}", hex::encode(digest))
}

fn derive(password: &str, salt: &str, iterations: u32) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut out);
    out
}

/// Check `password` against a stored hash.
pub fn verify_password(stored: &str, password: &str) -> Result<bool, BootError> {
    let mut parts = stored.splitn(3, '$');
    let (Some(method), Some(salt), Some(digest_hex)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(BootError::MalformedHash);
    };

    let iterations = match method.split(':').collect::<Vec<_>>().as_slice() {
        ["pbkdf2", "sha256", n] => n.parse::<u32>().map_err(|_| BootError::MalformedHash)?,
        ["pbkdf2", "sha256"] => PBKDF2_ITERATIONS,
        _ => return Err(BootError::MalformedHash),
    };
    let expected = hex::decode(digest_hex).map_err(|_| BootError::MalformedHash)?;
    if expected.len() != DIGEST_LEN {
        return Err(BootError::MalformedHash);
    }

    let actual = derive(password, salt, iterations);
    Ok(bool::from(actual.as_slice().ct_eq(expected.as_slice())))
}
