/*
    Test vectors for the DS (digital signature) peripheral.

    The peripheral receives an RSA private key as an AES-256-CBC encrypted
    parameter block. The AES key never leaves hardware: it is derived as
    HMAC-SHA256(efuse_key, 0xFF * 32). Inside, the block is decrypted, its
    checksum compared, and the key is fed into the Montgomery multiplier:

        Y || M || Rb || MD || M_prime || length || 0x08 * 8

    Y and M are the private exponent and modulus, Rb = R^2 mod M with
    R = 2^key_size, M_prime = -M^-1 mod 2^32 and length is the operand length
    in words minus one. Every operand slot is sized for the largest key the
    chip supports, so smaller keys are zero padded.

    For every case we emit the iv, the plaintext key material, the golden
    ciphertext and m^Y mod M for a fixed list of messages.
*/

pub mod error;
pub mod generator;
pub mod header;
pub mod montgomery;
pub mod plaintext;
pub mod target;
pub mod vector_gen;

pub use error::{Error, Result};
pub use generator::{generate_suite, GeneratorConfig, TestCase, TestSuite};
pub use target::Target;
