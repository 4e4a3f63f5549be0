//! Montgomery multiplication constants for the RSA peripheral.
//!
//! The peripheral works with `R = 2^key_size` and needs two values
//! precomputed from the modulus `M`:
//!
//! - `Rb = R^2 mod M`, used to move operands into Montgomery form,
//! - `M' = -M^-1 mod 2^32`, the per-word reduction factor.

use num_bigint::BigUint;

use crate::error::{Error, Result};

/// `2^(2 * key_size) mod m`
pub fn r_squared_mod(m: &BigUint, key_size: usize) -> BigUint {
    let rr = BigUint::from(1u32) << (key_size * 2);
    rr % m
}

/// Inverse of odd `a` modulo 2^32.
///
/// Uses Newton iteration: if `a * x = 1 mod 2^k` then
/// `a * x * (2 - a * x) = 1 mod 2^2k`. Any odd `a` is its own inverse
/// mod 2^3, so four steps reach 48 bits.
pub fn inverse_mod_2_32(a: u32) -> Result<u32> {
    if a & 1 == 0 {
        return Err(Error::EvenModulus);
    }
    let mut x = a;
    for _ in 0..4 {
        x = x.wrapping_mul(2u32.wrapping_sub(a.wrapping_mul(x)));
    }
    debug_assert_eq!(a.wrapping_mul(x), 1);
    Ok(x)
}

/// `-(m^-1) mod 2^32`. Only the low word of `m` matters.
pub fn m_prime(m: &BigUint) -> Result<u32> {
    let low = m.iter_u32_digits().next().unwrap_or(0);
    Ok(inverse_mod_2_32(low)?.wrapping_neg())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MontgomeryParams {
    pub rb: BigUint,
    pub m_prime: u32,
    /// Operand length in words, minus one.
    pub length: u32,
}

impl MontgomeryParams {
    pub fn new(m: &BigUint, key_size: usize) -> Result<Self> {
        if key_size == 0 || key_size % 32 != 0 {
            return Err(Error::InvalidKeySize(key_size));
        }
        // an odd modulus is also non-zero, so the reduction below cannot fail
        let m_prime = m_prime(m)?;
        let params = Self {
            rb: r_squared_mod(m, key_size),
            m_prime,
            length: (key_size / 32 - 1) as u32,
        };
        log::trace!(
            "montgomery params: key_size={} m_prime=0x{:08x} length={}",
            key_size,
            params.m_prime,
            params.length
        );
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_of_small_odd_values() {
        assert_eq!(inverse_mod_2_32(1).unwrap(), 1);
        assert_eq!(inverse_mod_2_32(3).unwrap(), 0xaaaa_aaab);
        assert_eq!(inverse_mod_2_32(u32::MAX).unwrap(), u32::MAX);
        for a in [5u32, 0x1234_5679, 0xffff_fffb, 0x8000_0001] {
            let x = inverse_mod_2_32(a).unwrap();
            assert_eq!(a.wrapping_mul(x), 1, "a = {:#x}", a);
        }
    }

    #[test]
    fn even_value_has_no_inverse() {
        assert!(matches!(inverse_mod_2_32(0), Err(Error::EvenModulus)));
        assert!(matches!(inverse_mod_2_32(0x10), Err(Error::EvenModulus)));
    }

    #[test]
    fn m_prime_is_negated_inverse() {
        // low word 0x00000003, higher words are ignored
        let m = (BigUint::from(0xdead_beefu32) << 32) + 3u32;
        let mp = m_prime(&m).unwrap();
        assert_eq!(mp, 0x5555_5555);
        assert_eq!(3u32.wrapping_mul(mp), u32::MAX);
    }

    #[test]
    fn r_squared_for_single_word_modulus() {
        // 2^32 = 5 mod (2^32 - 5), so R^2 = 25
        let m = BigUint::from(0xffff_fffbu32);
        assert_eq!(r_squared_mod(&m, 32), BigUint::from(25u32));
    }

    #[test]
    fn params_for_two_word_modulus() {
        let m = (BigUint::from(1u32) << 64) - 59u32;
        let params = MontgomeryParams::new(&m, 64).unwrap();
        assert_eq!(params.length, 1);
        assert_eq!(params.rb, BigUint::from(59u32 * 59));
        assert_eq!(
            (0u32.wrapping_sub(59)).wrapping_mul(params.m_prime),
            u32::MAX
        );
    }

    #[test]
    fn rejects_zero_and_even_moduli() {
        assert!(matches!(
            MontgomeryParams::new(&BigUint::from(0u32), 32),
            Err(Error::EvenModulus)
        ));
        assert!(matches!(
            MontgomeryParams::new(&BigUint::from(0x1_0000_0000u64), 64),
            Err(Error::EvenModulus)
        ));
    }

    #[test]
    fn rejects_bad_key_sizes() {
        let m = BigUint::from(0xffff_fffbu32);
        assert!(matches!(
            MontgomeryParams::new(&m, 0),
            Err(Error::InvalidKeySize(0))
        ));
        assert!(matches!(
            MontgomeryParams::new(&m, 1000),
            Err(Error::InvalidKeySize(1000))
        ));
    }
}
