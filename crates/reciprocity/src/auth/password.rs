use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
const COMPARE_KEY: &[u8] = b"reciprocity.password.compare.v1";

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("iteration count must be positive")]
    ZeroIterations,
    #[error("password hashing failed: {0}")]
    Derive(String),
}

/// Hashes a password with PBKDF2-HMAC-SHA256 under a fresh random salt.
/// The output embeds scheme, iteration count, and salt so stored hashes
/// stay verifiable after the configured cost changes.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let key = derive_key(password.as_bytes(), &salt, iterations)?;
    Ok(format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        hex::encode(salt),
        hex::encode(key)
    ))
}

/// Checks a password against a stored `pbkdf2$<iters>$<salt>$<hash>` entry.
/// Any malformed entry verifies as false rather than erroring, so a
/// corrupted row behaves like a wrong password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some(parsed) = parse_stored(stored) else {
        return false;
    };
    let Ok(candidate) = derive_key(password.as_bytes(), &parsed.salt, parsed.iterations) else {
        return false;
    };
    slices_match(&parsed.hash, &candidate)
}

struct StoredHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn parse_stored(stored: &str) -> Option<StoredHash> {
    let parts: Vec<&str> = stored.split('$').collect();
    match parts.as_slice() {
        ["pbkdf2", iterations, salt_hex, hash_hex] => {
            let iterations = iterations.parse::<u32>().ok().filter(|count| *count > 0)?;
            let salt = hex::decode(salt_hex).ok()?;
            let hash = hex::decode(hash_hex).ok()?;
            Some(StoredHash {
                iterations,
                salt,
                hash,
            })
        }
        _ => None,
    }
}

/// PBKDF2 with a 32-byte output, which is exactly one HMAC-SHA256 block.
fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<[u8; KEY_LEN], PasswordError> {
    if iterations == 0 {
        return Err(PasswordError::ZeroIterations);
    }

    let keyed = HmacSha256::new_from_slice(password)
        .map_err(|err| PasswordError::Derive(err.to_string()))?;

    let mut mac = keyed.clone();
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut round = mac.finalize().into_bytes();

    let mut derived = [0u8; KEY_LEN];
    derived.copy_from_slice(&round);

    for _ in 1..iterations {
        let mut mac = keyed.clone();
        mac.update(&round);
        round = mac.finalize().into_bytes();
        for (out, byte) in derived.iter_mut().zip(round.iter()) {
            *out ^= byte;
        }
    }

    Ok(derived)
}

/// Both sides are re-MACed under a fixed key, then compared through the
/// constant-time `verify_slice` primitive.
fn slices_match(expected: &[u8], candidate: &[u8]) -> bool {
    let Ok(mut expected_mac) = HmacSha256::new_from_slice(COMPARE_KEY) else {
        return false;
    };
    expected_mac.update(expected);

    let Ok(mut candidate_mac) = HmacSha256::new_from_slice(COMPARE_KEY) else {
        return false;
    };
    candidate_mac.update(candidate);

    candidate_mac
        .verify_slice(&expected_mac.finalize().into_bytes())
        .is_ok()
}
