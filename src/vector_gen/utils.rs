use num_bigint::BigUint;
use rand_core::RngCore;

/// Little-endian 32-bit words, least significant first, the layout used by
/// the RSA peripheral and mbedTLS. Zero has no words.
pub fn to_words(x: &BigUint) -> Vec<u32> {
    x.to_u32_digits()
}

/// Little-endian bytes of `x`, zero-extended to `pad_bits / 8` bytes. Longer
/// values are returned as is.
pub fn to_le_bytes(x: &BigUint, pad_bits: Option<usize>) -> Vec<u8> {
    let mut bytes = x.to_bytes_le();
    if let Some(bits) = pad_bits {
        let width = bits / 8;
        if bytes.len() < width {
            bytes.resize(width, 0);
        }
    }
    bytes
}

pub fn from_rsa(x: &rsa::BigUint) -> BigUint {
    BigUint::from_bytes_be(&x.to_bytes_be())
}

/// Uniformly random value in `[0, 2^bits)`.
pub fn random_below_pow2<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> BigUint {
    let mut bytes = vec![0u8; (bits + 7) / 8];
    rng.fill_bytes(&mut bytes);
    let spare = bytes.len() * 8 - bits;
    if let Some(top) = bytes.last_mut() {
        *top &= 0xffu8 >> spare;
    }
    BigUint::from_bytes_le(&bytes)
}

/// `2^bits - 1`
pub fn low_mask(bits: usize) -> BigUint {
    (BigUint::from(1u32) << bits) - 1u32
}

#[test]
fn test_to_words() {
    let x = BigUint::from(0x1_0000_0002u64);
    assert_eq!(to_words(&x), vec![2, 1]);
    assert!(to_words(&BigUint::from(0u32)).is_empty());
}

#[test]
fn test_to_le_bytes() {
    let x = BigUint::from(0x0102u32);
    assert_eq!(to_le_bytes(&x, None), vec![0x02, 0x01]);
    assert_eq!(to_le_bytes(&x, Some(32)), vec![0x02, 0x01, 0x00, 0x00]);
    // no truncation when the value is wider than the padding
    assert_eq!(to_le_bytes(&x, Some(8)), vec![0x02, 0x01]);
    assert_eq!(to_le_bytes(&BigUint::from(0u32), None), vec![0x00]);
}

#[test]
fn test_from_rsa() {
    let x = rsa::BigUint::from(0xdead_beef_cafe_f00du64);
    assert_eq!(from_rsa(&x), BigUint::from(0xdead_beef_cafe_f00du64));
}

#[test]
fn test_random_below_pow2() {
    use rand_chacha::rand_core::SeedableRng;

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let bound = BigUint::from(1u32) << 13;
    for _ in 0..64 {
        assert!(random_below_pow2(&mut rng, 13) < bound);
    }
    assert_eq!(low_mask(13) + 1u32, bound);
}
