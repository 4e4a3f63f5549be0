//! Error types for test-vector generation.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported target {0:?}")]
    UnsupportedTarget(String),

    #[error("key size {0} is not a positive multiple of 32 bits")]
    InvalidKeySize(usize),

    #[error("modulus must be odd to have an inverse mod 2^32")]
    EvenModulus,

    #[error("{name} is {len} bytes wide, block slot holds {max}")]
    OperandTooWide {
        name: &'static str,
        len: usize,
        max: usize,
    },

    #[error("plaintext block is {actual} bytes, expected {expected}")]
    PlaintextLength { actual: usize, expected: usize },

    #[error("a suite needs at least one HMAC key")]
    NoHmacKeys,

    #[error("invalid HMAC key length")]
    HmacKey,

    #[error("AES-CBC operation failed on a {0} byte buffer")]
    Cipher(usize),

    #[error("decrypted block does not end in 0x08 padding, wrong key or iv")]
    Padding,

    #[error(transparent)]
    Rsa(#[from] rsa::Error),

    #[error("self-check failed for case {case}: {reason}")]
    SelfCheck { case: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
