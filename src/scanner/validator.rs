//! Mint address validation.

/// Whether a string is a plausible token mint address.
///
/// Accepts base-58 strings (no `0`, `O`, `I`, `l`) of length 32..=44.
/// Addresses ending in `pump` (any case) are rejected: those are
/// program-derived accounts, not mints, and admitting them produces
/// false positives downstream.
pub fn is_valid_mint(s: &str) -> bool {
    if s.len() < 32 || s.len() > 44 {
        return false;
    }
    if !s.chars().all(is_base58_char) {
        return false;
    }
    // base-58 chars are ASCII, so byte slicing is safe here
    !s[s.len() - 4..].eq_ignore_ascii_case("pump")
}

fn is_base58_char(c: char) -> bool {
    matches!(c, '1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z')
}

#[cfg(test)]
mod tests {
    use super::*;

    // 40 chars, pure alphanumeric base-58
    const GOOD_MINT: &str = "4Nd1mKvZta7Bnx2PeXc5M8DqzWJuGy3RfEHsA9Tv";

    #[test]
    fn test_accepts_plain_mint() {
        assert!(is_valid_mint(GOOD_MINT));
        assert_eq!(GOOD_MINT.len(), 40);
    }

    #[test]
    fn test_rejects_length_bounds() {
        let base = "4Nd1mKvZta7Bnx2PeXc5M8DqzWJuGy3";
        assert_eq!(base.len(), 31);
        assert!(!is_valid_mint(base));
        assert!(is_valid_mint(&format!("{}R", base))); // 32: in range

        let long: String = "4Nd1mKvZta7B".chars().cycle().take(44).collect();
        assert!(is_valid_mint(&long));
        let too_long: String = "4Nd1mKvZta7B".chars().cycle().take(45).collect();
        assert!(!is_valid_mint(&too_long));
    }

    #[test]
    fn test_rejects_non_base58_alphabet() {
        for bad in ['0', 'O', 'I', 'l', '-', '_', ' '] {
            let mut s = GOOD_MINT.to_string();
            s.replace_range(10..11, &bad.to_string());
            assert!(!is_valid_mint(&s), "accepted char {:?}", bad);
        }
    }

    #[test]
    fn test_rejects_pump_suffix_any_case() {
        for suffix in ["pump", "PUMP", "PuMp", "pumP"] {
            let s = format!("4Nd1mKvZta7Bnx2PeXc5M8DqzWJuGy3RfEHs{}", suffix);
            assert_eq!(s.len(), 40);
            assert!(!is_valid_mint(&s), "accepted suffix {:?}", suffix);
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(!is_valid_mint(""));
    }
}
