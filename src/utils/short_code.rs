//! Short-code encoding for autogenerated entries
//!
//! Ids are written in base 62 over `0-9a-zA-Z`, most significant digit
//! first, without leading zeros. Positional notation without leading zeros
//! is a bijection between `u64` and its canonical digit strings, so two
//! distinct ids never share a code. `u64::MAX` needs 11 digits.

const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const RADIX: u64 = ALPHABET.len() as u64;
const MAX_DIGITS: usize = 11;

/// Encode an id as a compact alphanumeric code
pub fn encode(id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    let mut buf = [0u8; MAX_DIGITS];
    let mut pos = MAX_DIGITS;
    let mut n = id;
    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % RADIX) as usize];
        n /= RADIX;
    }

    // ALPHABET is ASCII
    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Inverse of [`encode`] for canonical codes
///
/// Returns `None` for empty input, characters outside the alphabet, leading
/// zeros, or values that do not fit in a `u64`.
pub fn decode(code: &str) -> Option<u64> {
    if code.is_empty() || code.len() > MAX_DIGITS || (code.len() > 1 && code.starts_with('0')) {
        return None;
    }

    code.bytes().try_fold(0u64, |acc, b| {
        let digit = digit_value(b)?;
        acc.checked_mul(RADIX)?.checked_add(digit)
    })
}

fn digit_value(b: u8) -> Option<u64> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u64),
        b'a'..=b'z' => Some((b - b'a') as u64 + 10),
        b'A'..=b'Z' => Some((b - b'A') as u64 + 36),
        _ => None,
    }
}

/// Full short URL of a generated entry: `prefix` followed by the encoded id
pub fn generated_short_url(prefix: &str, id: u64) -> String {
    let mut short_url = String::with_capacity(prefix.len() + MAX_DIGITS);
    short_url.push_str(prefix);
    short_url.push_str(&encode(id));
    short_url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(61), "Z");
        assert_eq!(encode(62), "10");
        assert_eq!(encode(62 * 62), "100");
    }

    #[test]
    fn test_encode_max_fits_in_eleven_chars() {
        let code = encode(u64::MAX);
        assert_eq!(code.len(), 11);
        assert_eq!(decode(&code), Some(u64::MAX));
    }

    #[test]
    fn test_encode_is_alphanumeric() {
        for id in [1u64, 42, 1_000_000, u32::MAX as u64, u64::MAX / 3] {
            assert!(encode(id).chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_encode_injective_over_dense_range() {
        let codes: HashSet<String> = (0..100_000u64).map(encode).collect();
        assert_eq!(codes.len(), 100_000);
    }

    #[test]
    fn test_encode_injective_near_digit_boundaries() {
        let mut ids = Vec::new();
        let mut power = 1u64;
        while let Some(next) = power.checked_mul(RADIX) {
            power = next;
            ids.extend([power - 1, power, power + 1]);
        }
        ids.extend([u64::MAX - 1, u64::MAX]);

        let codes: HashSet<String> = ids.iter().copied().map(encode).collect();
        assert_eq!(codes.len(), ids.len());
        for id in ids {
            assert_eq!(decode(&encode(id)), Some(id));
        }
    }

    #[test]
    fn test_decode_rejects_non_canonical() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("00"), None);
        assert_eq!(decode("01"), None);
        assert_eq!(decode("a-b"), None);
        assert_eq!(decode("zzzzzzzzzzzz"), None);
        // one past u64::MAX
        assert_eq!(decode("lYGhA16ahyg"), None);
    }

    #[test]
    fn test_generated_short_url() {
        assert_eq!(generated_short_url("-", 42), "-G");
        assert_eq!(generated_short_url("g_", 62), "g_10");
    }
}
