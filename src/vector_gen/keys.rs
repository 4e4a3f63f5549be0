use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use super::utils::{from_rsa, random_below_pow2};
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

pub const HMAC_KEY_LEN: usize = 32;
pub const AES_KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;

/// Message the peripheral MACs with the eFuse HMAC key to obtain the AES key
/// that unlocks its parameter block.
const AES_KEY_DERIVATION_INPUT: [u8; 32] = [0xff; 32];

/// An RSA private key reduced to the values the DS peripheral consumes.
#[derive(Clone, Debug)]
pub struct RsaKey {
    pub key_size: usize,
    /// Private exponent `d`.
    pub y: BigUint,
    /// Modulus `n`.
    pub m: BigUint,
    /// Public exponent, kept for self-checks.
    pub e: BigUint,
}

impl RsaKey {
    pub fn from_private_key(key: &RsaPrivateKey, key_size: usize) -> Self {
        Self {
            key_size,
            y: from_rsa(key.d()),
            m: from_rsa(key.n()),
            e: from_rsa(key.e()),
        }
    }
}

/// Fresh keypair with public exponent 65537.
pub fn generate_rsa_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key_size: usize,
) -> Result<RsaKey> {
    let private_key = RsaPrivateKey::new(rng, key_size)?;
    Ok(RsaKey::from_private_key(&private_key, key_size))
}

pub fn generate_hmac_keys<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Vec<[u8; HMAC_KEY_LEN]> {
    (0..count)
        .map(|_| {
            let mut key = [0u8; HMAC_KEY_LEN];
            rng.fill_bytes(&mut key);
            key
        })
        .collect()
}

pub fn generate_messages<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    count: usize,
    max_key_size: usize,
) -> Vec<BigUint> {
    (0..count)
        .map(|_| random_below_pow2(rng, max_key_size))
        .collect()
}

pub fn random_iv<R: CryptoRngCore + ?Sized>(rng: &mut R) -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut iv);
    iv
}

/// `HMAC-SHA256(hmac_key, 0xFF * 32)`
pub fn derive_aes_key(hmac_key: &[u8]) -> Result<[u8; AES_KEY_LEN]> {
    let mut mac = HmacSha256::new_from_slice(hmac_key).map_err(|_| Error::HmacKey)?;
    mac.update(&AES_KEY_DERIVATION_INPUT);
    Ok(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rsa_key_has_expected_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let key = generate_rsa_key(&mut rng, 1024).unwrap();

        assert_eq!(key.key_size, 1024);
        assert_eq!(key.m.bits(), 1024);
        assert_eq!(key.e, BigUint::from(65537u32));
        // x^(e*d) = x mod n
        let x = BigUint::from(0x1234_5678u32);
        assert_eq!(x.modpow(&key.e, &key.m).modpow(&key.y, &key.m), x);
    }

    #[test]
    fn seeded_generation_is_repeatable() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(generate_hmac_keys(&mut a, 3), generate_hmac_keys(&mut b, 3));
        assert_eq!(
            generate_messages(&mut a, 4, 1024),
            generate_messages(&mut b, 4, 1024)
        );
        assert_eq!(random_iv(&mut a), random_iv(&mut b));
    }

    #[test]
    fn messages_fit_max_key_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for m in generate_messages(&mut rng, 10, 3072) {
            assert!(m.bits() <= 3072);
        }
    }

    #[test]
    fn aes_key_matches_hmac_of_ff_block() {
        // RFC 4231 test case 1 key, message replaced by 32 bytes of 0xff
        let key = [0x0bu8; 20];
        let expected: [u8; 32] = [
            0x7f, 0xae, 0x81, 0xf4, 0x7e, 0xf5, 0x91, 0x3d, 0x4b, 0xf8, 0xec, 0xd4, 0x41, 0x6c,
            0x0e, 0x2c, 0x4d, 0xb2, 0xbf, 0xfe, 0x3f, 0xcc, 0x41, 0x12, 0xe2, 0xf1, 0x0a, 0xdf,
            0x79, 0x5f, 0xfe, 0x2b,
        ];

        assert_eq!(derive_aes_key(&key).unwrap(), expected);
        assert_ne!(derive_aes_key(&[0x0cu8; 20]).unwrap(), expected);
    }
}
