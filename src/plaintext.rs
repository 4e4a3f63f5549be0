//! Parameter block layout and its golden AES-256-CBC ciphertext.
//!
//! For a peripheral with maximum key size `W` bits the block is
//!
//! ```text
//! Y[W] || M[W] || Rb[W] || MD[256] || M_prime[32] || length[32] || 0x08 * 8
//! ```
//!
//! where every field is little-endian and
//! `MD = SHA-256(Y[W] || M[W] || Rb[W] || M_prime[32] || length[32] || IV[128])`.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::montgomery::MontgomeryParams;
use crate::vector_gen::keys::{AES_KEY_LEN, IV_LEN};
use crate::vector_gen::utils::to_le_bytes;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub const MD_LEN: usize = 32;
const PADDING: [u8; 8] = [0x08; 8];

/// Byte length of the block for a given maximum key size.
pub fn block_len(max_key_size: usize) -> usize {
    (max_key_size / 8) * 3 + MD_LEN + 8 + PADDING.len()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaintextBlock {
    pub max_key_size: usize,
    pub y: BigUint,
    pub m: BigUint,
    pub params: MontgomeryParams,
    pub md: [u8; MD_LEN],
}

fn operand(name: &'static str, x: &BigUint, max_key_size: usize) -> Result<Vec<u8>> {
    let bytes = to_le_bytes(x, Some(max_key_size));
    let max = max_key_size / 8;
    if bytes.len() > max {
        return Err(Error::OperandTooWide {
            name,
            len: bytes.len(),
            max,
        });
    }
    Ok(bytes)
}

fn tail(params: &MontgomeryParams) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&params.m_prime.to_le_bytes());
    out[4..].copy_from_slice(&params.length.to_le_bytes());
    out
}

impl PlaintextBlock {
    /// Computes the checksum over the operands and `iv`.
    pub fn new(
        y: &BigUint,
        m: &BigUint,
        params: &MontgomeryParams,
        iv: &[u8; IV_LEN],
        max_key_size: usize,
    ) -> Result<Self> {
        let mut md_in = Vec::with_capacity((max_key_size / 8) * 3 + 8 + IV_LEN);
        md_in.extend(operand("Y", y, max_key_size)?);
        md_in.extend(operand("M", m, max_key_size)?);
        md_in.extend(operand("Rb", &params.rb, max_key_size)?);
        md_in.extend_from_slice(&tail(params));
        md_in.extend_from_slice(iv);

        Ok(Self {
            max_key_size,
            y: y.clone(),
            m: m.clone(),
            params: params.clone(),
            md: Sha256::digest(&md_in).into(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut p = Vec::with_capacity(block_len(self.max_key_size));
        p.extend(operand("Y", &self.y, self.max_key_size)?);
        p.extend(operand("M", &self.m, self.max_key_size)?);
        p.extend(operand("Rb", &self.params.rb, self.max_key_size)?);
        p.extend_from_slice(&self.md);
        p.extend_from_slice(&tail(&self.params));
        p.extend_from_slice(&PADDING);

        let expected = block_len(self.max_key_size);
        if p.len() != expected {
            return Err(Error::PlaintextLength {
                actual: p.len(),
                expected,
            });
        }
        Ok(p)
    }

    /// Golden ciphertext the peripheral is expected to accept.
    pub fn encrypt(&self, aes_key: &[u8; AES_KEY_LEN], iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
        let mut buf = self.to_bytes()?;
        let len = buf.len();
        Aes256CbcEnc::new(aes_key.into(), iv.into())
            .encrypt_padded_mut::<NoPadding>(&mut buf, len)
            .map_err(|_| Error::Cipher(len))?;
        Ok(buf)
    }

    /// Decrypts `c` and splits it back into its fields. The checksum is
    /// taken from the block, not recomputed; compare against
    /// [`PlaintextBlock::new`] to validate it.
    pub fn decrypt(
        aes_key: &[u8; AES_KEY_LEN],
        iv: &[u8; IV_LEN],
        c: &[u8],
        max_key_size: usize,
    ) -> Result<Self> {
        let expected = block_len(max_key_size);
        if c.len() != expected {
            return Err(Error::PlaintextLength {
                actual: c.len(),
                expected,
            });
        }
        let mut buf = c.to_vec();
        let p = Aes256CbcDec::new(aes_key.into(), iv.into())
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| Error::Cipher(expected))?;

        let w = max_key_size / 8;
        let (y, rest) = p.split_at(w);
        let (m, rest) = rest.split_at(w);
        let (rb, rest) = rest.split_at(w);
        let (md, rest) = rest.split_at(MD_LEN);
        let word = |b: &[u8]| u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        let m_prime = word(&rest[..4]);
        let length = word(&rest[4..8]);
        if rest[8..] != PADDING {
            return Err(Error::Padding);
        }

        let mut md_out = [0u8; MD_LEN];
        md_out.copy_from_slice(md);
        Ok(Self {
            max_key_size,
            y: BigUint::from_bytes_le(y),
            m: BigUint::from_bytes_le(m),
            params: MontgomeryParams {
                rb: BigUint::from_bytes_le(rb),
                m_prime,
                length,
            },
            md: md_out,
        })
    }
}
