use num_bigint::BigUint;
use rand_core::CryptoRngCore;

use crate::error::{Error, Result};
use crate::montgomery::MontgomeryParams;
use crate::plaintext::PlaintextBlock;
use crate::target::{Target, NUM_CASES, NUM_HMAC_KEYS, NUM_MESSAGES};
use crate::vector_gen::expected::Exponentiation;
use crate::vector_gen::keys::{
    derive_aes_key, generate_hmac_keys, generate_messages, generate_rsa_key, random_iv, RsaKey,
    HMAC_KEY_LEN, IV_LEN,
};

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub target: Target,
    pub num_hmac_keys: usize,
    pub num_messages: usize,
    pub num_cases: usize,
}

impl GeneratorConfig {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            num_hmac_keys: NUM_HMAC_KEYS,
            num_messages: NUM_MESSAGES,
            num_cases: NUM_CASES,
        }
    }
}

/// One `encrypt_testcase_t` entry.
#[derive(Clone, Debug)]
pub struct TestCase {
    pub iv: [u8; IV_LEN],
    pub hmac_key_idx: usize,
    pub key_size: usize,
    pub y: BigUint,
    pub m: BigUint,
    pub e: BigUint,
    pub params: MontgomeryParams,
    pub expected_c: Vec<u8>,
    pub expected_results: Vec<BigUint>,
}

impl TestCase {
    /// Builds a case from an existing key. `messages` are the suite-wide
    /// inputs, `max_key_size` sizes the parameter block.
    pub fn from_key(
        key: &RsaKey,
        hmac_key: &[u8; HMAC_KEY_LEN],
        hmac_key_idx: usize,
        iv: [u8; IV_LEN],
        messages: &[BigUint],
        max_key_size: usize,
    ) -> Result<Self> {
        let aes_key = derive_aes_key(hmac_key)?;
        let params = MontgomeryParams::new(&key.m, key.key_size)?;
        let block = PlaintextBlock::new(&key.y, &key.m, &params, &iv, max_key_size)?;
        let expected_c = block.encrypt(&aes_key, &iv)?;
        let expected_results = Exponentiation::new(key).results(messages);

        Ok(Self {
            iv,
            hmac_key_idx,
            key_size: key.key_size,
            y: key.y.clone(),
            m: key.m.clone(),
            e: key.e.clone(),
            params,
            expected_c,
            expected_results,
        })
    }

    fn key(&self) -> RsaKey {
        RsaKey {
            key_size: self.key_size,
            y: self.y.clone(),
            m: self.m.clone(),
            e: self.e.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TestSuite {
    pub target: Target,
    pub max_key_size: usize,
    pub hmac_keys: Vec<[u8; HMAC_KEY_LEN]>,
    pub messages: Vec<BigUint>,
    pub cases: Vec<TestCase>,
}

/// Draws all random material from `rng` in a fixed order, so a seeded
/// generator always yields the same suite.
pub fn generate_suite<R: CryptoRngCore + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<TestSuite> {
    if config.num_hmac_keys == 0 {
        return Err(Error::NoHmacKeys);
    }
    let target = config.target;
    let max_key_size = target.max_key_size();
    log::info!(
        "Generating tests cases for {} (max key size = {})",
        target,
        max_key_size
    );

    let hmac_keys = generate_hmac_keys(rng, config.num_hmac_keys);
    let messages = generate_messages(rng, config.num_messages, max_key_size);

    let mut cases = Vec::with_capacity(config.num_cases);
    for case in 0..config.num_cases {
        let iv = random_iv(rng);
        let hmac_key_idx = (rng.next_u32() as usize) % config.num_hmac_keys;
        let key_size = target.key_size_for_case(case);
        log::debug!(
            "case {}: {} bit key, hmac key {}",
            case,
            key_size,
            hmac_key_idx
        );

        let key = generate_rsa_key(rng, key_size)?;
        cases.push(TestCase::from_key(
            &key,
            &hmac_keys[hmac_key_idx],
            hmac_key_idx,
            iv,
            &messages,
            max_key_size,
        )?);
    }

    Ok(TestSuite {
        target,
        max_key_size,
        hmac_keys,
        messages,
        cases,
    })
}

impl TestSuite {
    /// Decrypts every golden ciphertext and re-derives what the peripheral
    /// would compute from it.
    pub fn verify(&self) -> Result<()> {
        for (i, case) in self.cases.iter().enumerate() {
            let fail = |reason: &str| Error::SelfCheck {
                case: i,
                reason: reason.to_string(),
            };

            let hmac_key = self
                .hmac_keys
                .get(case.hmac_key_idx)
                .ok_or_else(|| fail("hmac key index out of range"))?;
            let aes_key = derive_aes_key(hmac_key)?;
            let block =
                PlaintextBlock::decrypt(&aes_key, &case.iv, &case.expected_c, self.max_key_size)
                    .map_err(|e| fail(&e.to_string()))?;

            if block.y != case.y || block.m != case.m {
                return Err(fail("key operands do not match"));
            }
            if block.params != MontgomeryParams::new(&case.m, case.key_size)? {
                return Err(fail("montgomery parameters do not match"));
            }
            let recomputed = PlaintextBlock::new(
                &block.y,
                &block.m,
                &block.params,
                &case.iv,
                self.max_key_size,
            )?;
            if recomputed.md != block.md {
                return Err(fail("checksum mismatch"));
            }

            if case.expected_results.len() != self.messages.len() {
                return Err(fail("result count does not match message count"));
            }
            let key = case.key();
            let exp = Exponentiation::new(&key);
            for (j, (m, r)) in self
                .messages
                .iter()
                .zip(case.expected_results.iter())
                .enumerate()
            {
                if !exp.verify(m, r) {
                    return Err(fail(&format!("result for message {} is wrong", j)));
                }
            }
            log::trace!("case {} verified", i);
        }
        Ok(())
    }
}
