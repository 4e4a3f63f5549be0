use num_bigint::BigUint;

use super::keys::RsaKey;
use super::utils::low_mask;

/// Computes the results the peripheral must produce for a key: `m^Y mod M`
/// with messages truncated to the key length.
pub struct Exponentiation<'a> {
    key: &'a RsaKey,
    mask: BigUint,
}

impl<'a> Exponentiation<'a> {
    pub fn new(key: &'a RsaKey) -> Self {
        Self {
            key,
            mask: low_mask(key.key_size),
        }
    }

    /// Message as the peripheral sees it, cut to `key_size` bits.
    pub fn truncate(&self, message: &BigUint) -> BigUint {
        message & &self.mask
    }

    pub fn result(&self, message: &BigUint) -> BigUint {
        self.truncate(message).modpow(&self.key.y, &self.key.m)
    }

    pub fn results(&self, messages: &[BigUint]) -> Vec<BigUint> {
        messages.iter().map(|m| self.result(m)).collect()
    }

    /// `result^e mod M == message mod M`
    pub fn verify(&self, message: &BigUint, result: &BigUint) -> bool {
        let expected = self.truncate(message) % &self.key.m;
        result.modpow(&self.key.e, &self.key.m) == expected
    }
}

#[test]
fn test_textbook_key() {
    // p = 61, q = 53, n = 3233, e = 17, d = 2753
    let key = RsaKey {
        key_size: 32,
        y: BigUint::from(2753u32),
        m: BigUint::from(3233u32),
        e: BigUint::from(17u32),
    };
    let exp = Exponentiation::new(&key);

    assert_eq!(exp.result(&BigUint::from(2790u32)), BigUint::from(65u32));
    assert!(exp.verify(&BigUint::from(2790u32), &BigUint::from(65u32)));
    assert!(!exp.verify(&BigUint::from(2790u32), &BigUint::from(66u32)));

    // bits above the key size are dropped before exponentiation
    let long = (BigUint::from(0xabcdu32) << 32) + 2790u32;
    assert_eq!(exp.truncate(&long), BigUint::from(2790u32));
    assert_eq!(exp.result(&long), BigUint::from(65u32));

    let results = exp.results(&[BigUint::from(2790u32), long]);
    assert_eq!(results, vec![BigUint::from(65u32); 2]);
}

#[test]
fn test_generated_key() {
    use super::keys::{generate_messages, generate_rsa_key};
    use rand_chacha::rand_core::SeedableRng;

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
    let key = generate_rsa_key(&mut rng, 1024).unwrap();
    let messages = generate_messages(&mut rng, 4, 2048);
    let exp = Exponentiation::new(&key);

    for (m, r) in messages.iter().zip(exp.results(&messages)) {
        assert!(r < key.m);
        assert!(exp.verify(m, &r));
    }
}
