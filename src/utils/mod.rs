pub mod clock;
pub mod short_code;

pub use clock::{Clock, FixedClock, SystemClock};
pub use short_code::{decode, encode, generated_short_url};

/// Blank input (empty or whitespace-only) counts as missing
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
