// 🔑 Password hashing and token generation
//
// PBKDF2-HMAC-SHA256 with a random 16-byte salt per user. Salt and derived
// key are stored hex-encoded; the round count is stored next to them so it
// can be raised without invalidating existing users.

use rand::RngCore;
use sha2::Sha256;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
const TOKEN_LEN: usize = 32;

/// Stored form of a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
    pub rounds: u32,
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut key);
    key
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str, rounds: u32) -> PasswordHash {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let key = derive(password, &salt, rounds);
    PasswordHash {
        salt: hex::encode(salt),
        hash: hex::encode(key),
        rounds,
    }
}

/// Check a password against its stored hash.
///
/// Returns false for malformed stored values instead of erroring; a corrupt
/// row simply cannot be signed into.
pub fn verify_password(password: &str, stored: &PasswordHash) -> bool {
    let (Ok(salt), Ok(expected)) = (hex::decode(&stored.salt), hex::decode(&stored.hash)) else {
        return false;
    };

    let key = derive(password, &salt, stored.rounds);
    constant_time_eq(&key, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Random hex token for sessions and confirmation links
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
