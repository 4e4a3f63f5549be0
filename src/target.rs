use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

pub const NUM_HMAC_KEYS: usize = 3;
pub const NUM_MESSAGES: usize = 10;
pub const NUM_CASES: usize = 6;

/// Chip whose DS peripheral the vectors are generated for. Each chip
/// supports a different set of RSA key lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Esp32s2,
    Esp32c3,
    Esp32s3,
    Esp32c6,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::Esp32s2,
        Target::Esp32c3,
        Target::Esp32s3,
        Target::Esp32c6,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Target::Esp32s2 => "esp32s2",
            Target::Esp32c3 => "esp32c3",
            Target::Esp32s3 => "esp32s3",
            Target::Esp32c6 => "esp32c6",
        }
    }

    /// Key sizes in bits, largest first. Case `i` of a suite uses
    /// `key_sizes()[i % key_sizes().len()]`.
    pub fn key_sizes(&self) -> &'static [usize] {
        match self {
            Target::Esp32s2 | Target::Esp32s3 => &[4096, 3072, 2048, 1024],
            Target::Esp32c3 | Target::Esp32c6 => &[3072, 2048, 1024],
        }
    }

    pub fn max_key_size(&self) -> usize {
        self.key_sizes().iter().copied().max().unwrap_or(0)
    }

    pub fn key_size_for_case(&self, case: usize) -> usize {
        let sizes = self.key_sizes();
        sizes[case % sizes.len()]
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Target::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::UnsupportedTarget(s.to_string()))
    }
}

#[test]
fn test_key_size_table() {
    assert_eq!(Target::Esp32s2.max_key_size(), 4096);
    assert_eq!(Target::Esp32s3.max_key_size(), 4096);
    assert_eq!(Target::Esp32c3.max_key_size(), 3072);
    assert_eq!(Target::Esp32c6.max_key_size(), 3072);

    // six cases walk the c3 table twice
    let sizes: Vec<usize> = (0..NUM_CASES)
        .map(|case| Target::Esp32c3.key_size_for_case(case))
        .collect();
    assert_eq!(sizes, vec![3072, 2048, 1024, 3072, 2048, 1024]);

    let sizes: Vec<usize> = (0..NUM_CASES)
        .map(|case| Target::Esp32s2.key_size_for_case(case))
        .collect();
    assert_eq!(sizes, vec![4096, 3072, 2048, 1024, 4096, 3072]);
}

#[test]
fn test_parse_target() {
    for target in Target::ALL {
        assert_eq!(target.name().parse::<Target>().unwrap(), target);
        assert_eq!(target.to_string(), target.name());
    }
    assert!(matches!(
        "esp32".parse::<Target>(),
        Err(Error::UnsupportedTarget(name)) if name == "esp32"
    ));
}
