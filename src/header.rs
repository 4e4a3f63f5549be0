//! C header serialization of a [`TestSuite`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use num_bigint::BigUint;

use crate::error::Result;
use crate::generator::{TestCase, TestSuite};
use crate::vector_gen::utils::to_words;

pub const DEFAULT_FILE_NAME: &str = "digital_signature_test_cases.h";

/// `{ 0x%08x, ... }`, least significant word first.
pub fn words_as_c_array(x: &BigUint) -> String {
    let words: Vec<String> = to_words(x).iter().map(|w| format!("0x{:08x}", w)).collect();
    format!("{{ {} }}", words.join(", "))
}

/// `{ 0x%02x, ... }`
pub fn bytes_as_c_array(bytes: &[u8]) -> String {
    let bytes: Vec<String> = bytes.iter().map(|b| format!("0x{:02x}", b)).collect();
    format!("{{ {} }}", bytes.join(", "))
}

fn write_banner<W: Write>(out: &mut W, year: i32) -> io::Result<()> {
    writeln!(out, "/*")?;
    writeln!(
        out,
        " * SPDX-FileCopyrightText: {} Espressif Systems (Shanghai) CO LTD",
        year
    )?;
    writeln!(out, " *")?;
    writeln!(out, " * SPDX-License-Identifier: Apache-2.0")?;
    writeln!(out, " *")?;
    writeln!(out, " * File generated by {}", env!("CARGO_PKG_NAME"))?;
    writeln!(out, " */")
}

fn write_case<W: Write>(out: &mut W, index: usize, case: &TestCase) -> io::Result<()> {
    writeln!(out, "    {{ /* Case {} */", index)?;
    writeln!(out, "        .iv = {},", bytes_as_c_array(&case.iv))?;
    writeln!(out, "        .p_data = {{")?;
    writeln!(out, "            .Y = {},", words_as_c_array(&case.y))?;
    writeln!(out, "            .M = {},", words_as_c_array(&case.m))?;
    writeln!(out, "            .Rb = {},", words_as_c_array(&case.params.rb))?;
    writeln!(out, "            .M_prime = 0x{:08x},", case.params.m_prime)?;
    writeln!(
        out,
        "            .length = {}, // {} bit",
        case.params.length, case.key_size
    )?;
    writeln!(out, "        }},")?;
    writeln!(out, "        .expected_c = {},", bytes_as_c_array(&case.expected_c))?;
    writeln!(out, "        .hmac_key_idx = {},", case.hmac_key_idx)?;
    writeln!(
        out,
        "        // results of message array encrypted with these keys"
    )?;
    writeln!(out, "        .expected_results = {{")?;
    for (i, result) in case.expected_results.iter().enumerate() {
        writeln!(out, "        // Message {}", i)?;
        writeln!(out, "      {},", words_as_c_array(result))?;
    }
    writeln!(out, "     }},")?;
    writeln!(out, "     }},")
}

pub fn write_header<W: Write>(out: &mut W, suite: &TestSuite, year: i32) -> io::Result<()> {
    write_banner(out, year)?;

    writeln!(out, "#define NUM_HMAC_KEYS {}\n", suite.hmac_keys.len())?;
    writeln!(
        out,
        "static const uint8_t test_hmac_keys[NUM_HMAC_KEYS][32] = {{"
    )?;
    for key in &suite.hmac_keys {
        writeln!(out, "     {},", bytes_as_c_array(key))?;
    }
    writeln!(out, "}};\n")?;

    writeln!(out, "#define NUM_MESSAGES {}\n", suite.messages.len())?;
    writeln!(
        out,
        "static const uint32_t test_messages[NUM_MESSAGES][{}/32] = {{",
        suite.max_key_size
    )?;
    for (i, message) in suite.messages.iter().enumerate() {
        writeln!(out, "        // Message {}", i)?;
        writeln!(out, "        {},", words_as_c_array(message))?;
    }
    writeln!(out, "    }};")?;
    writeln!(out, "\n\n")?;

    writeln!(out, "#define NUM_CASES {}\n", suite.cases.len())?;
    writeln!(
        out,
        "static const encrypt_testcase_t test_cases[NUM_CASES] = {{"
    )?;
    for (i, case) in suite.cases.iter().enumerate() {
        write_case(out, i, case)?;
    }
    writeln!(out, "}};")
}

pub fn render(suite: &TestSuite, year: i32) -> Result<String> {
    let mut buf = Vec::new();
    write_header(&mut buf, suite, year)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

pub fn write_header_file(path: &Path, suite: &TestSuite, year: i32) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, suite, year)?;
    out.flush()?;
    log::info!("Wrote {} test cases to {}", suite.cases.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::montgomery::MontgomeryParams;
    use crate::target::Target;

    #[test]
    fn c_arrays() {
        assert_eq!(
            words_as_c_array(&BigUint::from(0x1_0000_0002u64)),
            "{ 0x00000002, 0x00000001 }"
        );
        assert_eq!(words_as_c_array(&BigUint::from(0u32)), "{  }");
        assert_eq!(bytes_as_c_array(&[0x01, 0xab]), "{ 0x01, 0xab }");
    }

    fn fixture() -> TestSuite {
        let case = TestCase {
            iv: [0x11; 16],
            hmac_key_idx: 2,
            key_size: 1024,
            y: BigUint::from(0xaabb_ccddu32),
            m: BigUint::from(0xffff_fffbu32),
            e: BigUint::from(65537u32),
            params: MontgomeryParams {
                rb: BigUint::from(25u32),
                m_prime: 0x3333_3333,
                length: 31,
            },
            expected_c: vec![0xc0, 0xff, 0xee],
            expected_results: vec![BigUint::from(7u32), BigUint::from(0x1_0000_0000u64)],
        };
        TestSuite {
            target: Target::Esp32c3,
            max_key_size: 3072,
            hmac_keys: vec![[0x01; 32]],
            messages: vec![BigUint::from(1u32), BigUint::from(2u32)],
            cases: vec![case],
        }
    }

    #[test]
    fn header_text() {
        let text = render(&fixture(), 2024).unwrap();
        let key = bytes_as_c_array(&[0x01; 32]);
        let iv = bytes_as_c_array(&[0x11; 16]);
        let expected = format!(
            "/*
 * SPDX-FileCopyrightText: 2024 Espressif Systems (Shanghai) CO LTD
 *
 * SPDX-License-Identifier: Apache-2.0
 *
 * File generated by ds-testgen
 */
#define NUM_HMAC_KEYS 1

static const uint8_t test_hmac_keys[NUM_HMAC_KEYS][32] = {{
     {key},
}};

#define NUM_MESSAGES 2

static const uint32_t test_messages[NUM_MESSAGES][3072/32] = {{
        // Message 0
        {{ 0x00000001 }},
        // Message 1
        {{ 0x00000002 }},
    }};



#define NUM_CASES 1

static const encrypt_testcase_t test_cases[NUM_CASES] = {{
    {{ /* Case 0 */
        .iv = {iv},
        .p_data = {{
            .Y = {{ 0xaabbccdd }},
            .M = {{ 0xfffffffb }},
            .Rb = {{ 0x00000019 }},
            .M_prime = 0x33333333,
            .length = 31, // 1024 bit
        }},
        .expected_c = {{ 0xc0, 0xff, 0xee }},
        .hmac_key_idx = 2,
        // results of message array encrypted with these keys
        .expected_results = {{
        // Message 0
      {{ 0x00000007 }},
        // Message 1
      {{ 0x00000000, 0x00000001 }},
     }},
     }},
}};
",
            key = key,
            iv = iv
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn header_file() {
        let dir = std::env::temp_dir().join(format!("ds-testgen-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(DEFAULT_FILE_NAME);

        write_header_file(&path, &fixture(), 2030).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, render(&fixture(), 2030).unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
