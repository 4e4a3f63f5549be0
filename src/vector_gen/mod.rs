pub mod expected;
pub mod keys;
pub mod utils;
