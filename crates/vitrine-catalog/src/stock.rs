//! Stock code generation.
//!
//! Codes are `STK-` followed by five random base-36 characters. No check is
//! made against codes already in the catalog, so collisions are possible.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 5;

/// Stock code prefix.
pub const STOCK_PREFIX: &str = "STK-";

/// Generate a fresh stock code.
pub fn generate_stock_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{STOCK_PREFIX}{suffix}")
}
