use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

/// Hashes a password with a fresh per-call salt. Cost parameters come from
/// the argon2 defaults and are tunable through [`Argon2::new`] if the
/// deployment needs a different work factor.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Checks a plaintext against a stored PHC-format hash. A malformed stored
/// hash counts as a mismatch rather than an error, so callers cannot tell a
/// broken record apart from a wrong password.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple1";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let password = "Secur3P@ssw0rd!";
        let first = hash_password(password).expect("hashing should succeed");
        let second = hash_password(password).expect("hashing should succeed");
        assert_ne!(first, second);
        assert!(verify_password(password, &first));
        assert!(verify_password(password, &second));
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
    }
}
