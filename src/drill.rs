// src/drill.rs  —  Random practice-group generator
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Charset;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS:  &[u8] = b"0123456789";

/// `n` random groups of `group_len` characters, space-separated —
/// classic copy-practice traffic (e.g. "XQJTV KDOWP").
pub fn groups(rng: &mut impl Rng, charset: Charset, n: usize, group_len: usize) -> String {
    let pool: Vec<u8> = match charset {
        Charset::Letters => LETTERS.to_vec(),
        Charset::Digits  => DIGITS.to_vec(),
        Charset::Mixed   => LETTERS.iter().chain(DIGITS).copied().collect(),
    };
    let group_len = group_len.max(1);
    (0..n)
        .map(|_| {
            (0..group_len)
                .map(|_| *pool.choose(rng).unwrap() as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn groups_have_requested_shape() {
        let mut rng = SmallRng::seed_from_u64(7);
        let text = groups(&mut rng, Charset::Letters, 4, 5);
        let words: Vec<&str> = text.split(' ').collect();
        assert_eq!(words.len(), 4);
        assert!(words.iter().all(|w| w.len() == 5));
        assert!(text.chars().all(|c| c.is_ascii_uppercase() || c == ' '));
    }

    #[test]
    fn digit_charset_stays_numeric() {
        let mut rng = SmallRng::seed_from_u64(7);
        let text = groups(&mut rng, Charset::Digits, 3, 4);
        assert!(text.chars().all(|c| c.is_ascii_digit() || c == ' '));
    }

    #[test]
    fn zero_length_groups_are_clamped() {
        let mut rng = SmallRng::seed_from_u64(7);
        let text = groups(&mut rng, Charset::Mixed, 2, 0);
        assert_eq!(text.split(' ').count(), 2);
        assert!(text.split(' ').all(|w| w.len() == 1));
    }
}
