use rand::rngs::OsRng;
use rand::RngCore;
use scrypt::Params;
use subtle::ConstantTimeEq;
use tracing::error;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 64;
// N = 2^14, r = 8, p = 1: the interactive-login cost tier.
const LOG_N: u8 = 14;

fn kdf_params() -> Result<Params, scrypt::errors::InvalidParams> {
    Params::new(LOG_N, 8, 1, KEY_LEN)
}

/// Derives `saltHex:derivedKeyHex` from the plaintext. The hex form of the
/// salt is what feeds the KDF, so `verify_password` can replay it straight
/// from the stored string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);

    let params = kdf_params().map_err(|e| {
        error!(error = %e, "scrypt params error");
        anyhow::anyhow!(e.to_string())
    })?;
    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(plain.as_bytes(), salt_hex.as_bytes(), &params, &mut key).map_err(|e| {
        error!(error = %e, "scrypt derive error");
        anyhow::anyhow!(e.to_string())
    })?;

    Ok(format!("{}:{}", salt_hex, hex::encode(key)))
}

/// Recomputes the derived key with the stored salt and compares in constant
/// time. A malformed stored value or a length mismatch reads as a failed
/// verification, never an error.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Some((salt, key_hex)) = stored.split_once(':') else {
        return false;
    };
    if salt.is_empty() || key_hex.is_empty() {
        return false;
    }
    let Ok(stored_key) = hex::decode(key_hex) else {
        return false;
    };
    if stored_key.len() != KEY_LEN {
        return false;
    }

    let Ok(params) = kdf_params() else {
        return false;
    };
    let mut derived = [0u8; KEY_LEN];
    if scrypt::scrypt(plain.as_bytes(), salt.as_bytes(), &params, &mut derived).is_err() {
        return false;
    }

    derived.ct_eq(stored_key.as_slice()).into()
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
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_is_false_on_malformed_stored_values() {
        for stored in [
            "",
            "not-a-valid-hash",
            ":",
            "saltonly:",
            ":keyonly",
            "salt:zz-not-hex",
            "salt:abcd", // wrong derived-key length
        ] {
            assert!(!verify_password("anything", stored), "accepted {stored:?}");
        }
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").expect("hash a");
        let b = hash_password("same-password").expect("hash b");
        assert_ne!(a, b);
    }
}
