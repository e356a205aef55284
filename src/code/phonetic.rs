// src/code/phonetic.rs  —  NATO phonetic table + text → call-out sequence
/// NATO phonetic alphabet (ICAO spellings, digits spoken plainly)
pub fn char_to_word(c: char) -> Option<&'static str> {
    match c.to_ascii_uppercase() {
        'A' => Some("ALPHA"),    'B' => Some("BRAVO"),   'C' => Some("CHARLIE"),
        'D' => Some("DELTA"),    'E' => Some("ECHO"),    'F' => Some("FOXTROT"),
        'G' => Some("GOLF"),     'H' => Some("HOTEL"),   'I' => Some("INDIA"),
        'J' => Some("JULIET"),   'K' => Some("KILO"),    'L' => Some("LIMA"),
        'M' => Some("MIKE"),     'N' => Some("NOVEMBER"),'O' => Some("OSCAR"),
        'P' => Some("PAPA"),     'Q' => Some("QUEBEC"),  'R' => Some("ROMEO"),
        'S' => Some("SIERRA"),   'T' => Some("TANGO"),   'U' => Some("UNIFORM"),
        'V' => Some("VICTOR"),   'W' => Some("WHISKEY"), 'X' => Some("XRAY"),
        'Y' => Some("YANKEE"),   'Z' => Some("ZULU"),
        '0' => Some("ZERO"),     '1' => Some("ONE"),     '2' => Some("TWO"),
        '3' => Some("THREE"),    '4' => Some("FOUR"),    '5' => Some("FIVE"),
        '6' => Some("SIX"),      '7' => Some("SEVEN"),   '8' => Some("EIGHT"),
        '9' => Some("NINE"),
        _   => None,
    }
}

/// One playback unit of the phonetic walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneticUnit {
    /// An alphanumeric character and the word called out for it.
    /// Alphanumerics outside the table keep the character itself as the word.
    Say { ch: char, word: String },
    /// A word gap (one per input space)
    Gap,
}

/// Plan the phonetic playback for `text`: alphanumerics in order, spaces as
/// word gaps, everything else passed over silently.
pub fn phonetic_units(text: &str) -> Vec<PhoneticUnit> {
    let mut units = Vec::new();
    for ch in text.to_uppercase().chars() {
        if ch.is_alphanumeric() {
            let word = char_to_word(ch)
                .map(str::to_string)
                .unwrap_or_else(|| ch.to_string());
            units.push(PhoneticUnit::Say { ch, word });
        } else if ch == ' ' {
            units.push(PhoneticUnit::Gap);
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_total_for_letters_and_digits() {
        for c in ('A'..='Z').chain('0'..='9') {
            assert!(char_to_word(c).is_some(), "no word for {c}");
        }
    }

    #[test]
    fn alpha_bravo() {
        assert_eq!(char_to_word('A'), Some("ALPHA"));
        assert_eq!(char_to_word('b'), Some("BRAVO"));
        assert_eq!(char_to_word('0'), Some("ZERO"));
    }

    #[test]
    fn ab_plans_in_order() {
        let units = phonetic_units("AB");
        assert_eq!(
            units,
            vec![
                PhoneticUnit::Say { ch: 'A', word: "ALPHA".into() },
                PhoneticUnit::Say { ch: 'B', word: "BRAVO".into() },
            ]
        );
    }

    #[test]
    fn punctuation_is_silent_spaces_are_gaps() {
        let units = phonetic_units("A! B");
        assert_eq!(
            units,
            vec![
                PhoneticUnit::Say { ch: 'A', word: "ALPHA".into() },
                PhoneticUnit::Gap,
                PhoneticUnit::Say { ch: 'B', word: "BRAVO".into() },
            ]
        );
    }
}
