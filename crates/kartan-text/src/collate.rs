#![forbid(unsafe_code)]

//! Swedish alphabetical ordering.
//!
//! Implements the subset of the Swedish collation that matters for place and
//! initiative names:
//!
//! - `å`, `ä`, `ö` are letters of their own and sort after `z`
//!   (`æ` sorts as `ä`, `ø` as `ö`, `ü` as `y`);
//! - other accented letters sort with their base letter (`é` with `e`);
//! - whitespace and punctuation sort before digits, digits before letters;
//! - case and accents only break ties, lowercase first.
//!
//! Keys are total orders: two keys compare equal only for identical input, so
//! a stable sort keyed on [`sort_key`] keeps encounter order for equal strings
//! and nothing else.
//!
//! # Example
//! ```
//! use kartan_text::collate::compare;
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare("Västerås", "Örebro"), Ordering::Less);
//! assert_eq!(compare("Orsa", "Örebro"), Ordering::Less);
//! assert_eq!(compare("Ånge", "Ödeshög"), Ordering::Less);
//! ```

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

const CLASS_SPACE: u32 = 1 << 24;
const CLASS_PUNCT: u32 = 2 << 24;
const CLASS_DIGIT: u32 = 3 << 24;
const CLASS_LETTER: u32 = 4 << 24;
const CLASS_OTHER: u32 = 5 << 24;

/// Letter rank of `z` in the primary alphabet; the Swedish extras follow it.
const RANK_Z: u32 = 25;
const RANK_A_RING: u32 = RANK_Z + 1;
const RANK_A_DIAERESIS: u32 = RANK_Z + 2;
const RANK_O_DIAERESIS: u32 = RANK_Z + 3;

/// Precomputed comparison key for a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollationKey {
    primary: Vec<u32>,
    secondary: Vec<u32>,
    tertiary: Vec<u8>,
    raw: String,
}

impl CollationKey {
    /// The string the key was built from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Build the collation key for `s`.
#[must_use]
pub fn sort_key(s: &str) -> CollationKey {
    let mut primary = Vec::with_capacity(s.len());
    let mut secondary = Vec::with_capacity(s.len());
    let mut tertiary = Vec::with_capacity(s.len());

    for ch in s.nfc() {
        let upper = ch.is_uppercase();
        for lower in ch.to_lowercase() {
            let (weight, accent) = weigh(lower);
            if weight == 0 {
                continue;
            }
            primary.push(weight);
            secondary.push(accent);
            tertiary.push(u8::from(upper));
        }
    }

    CollationKey {
        primary,
        secondary,
        tertiary,
        raw: s.to_owned(),
    }
}

/// Compare two strings in Swedish alphabetical order.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Primary weight and accent weight for one lowercase char.
///
/// A primary weight of zero means the char is ignorable (a lone combining
/// mark).
fn weigh(ch: char) -> (u32, u32) {
    match ch {
        'å' => return (CLASS_LETTER | RANK_A_RING, 0),
        'ä' => return (CLASS_LETTER | RANK_A_DIAERESIS, 0),
        'æ' => return (CLASS_LETTER | RANK_A_DIAERESIS, 1),
        'ö' => return (CLASS_LETTER | RANK_O_DIAERESIS, 0),
        'ø' => return (CLASS_LETTER | RANK_O_DIAERESIS, 1),
        'ü' => return (CLASS_LETTER | letter_rank('y'), 1),
        _ => {}
    }

    if ch.is_ascii_lowercase() {
        return (CLASS_LETTER | letter_rank(ch), 0);
    }
    if ch.is_ascii_digit() {
        return (CLASS_DIGIT | (ch as u32 - '0' as u32), 0);
    }
    if ch.is_whitespace() {
        return (CLASS_SPACE, 0);
    }
    if ch.is_ascii_punctuation() {
        return (CLASS_PUNCT | ch as u32, 0);
    }
    if is_combining_mark(ch) {
        return (0, 0);
    }

    // Fold accented Latin letters onto their base letter and keep the accent
    // as a secondary difference.
    let mut decomposed = std::iter::once(ch).nfd();
    if let Some(base) = decomposed.next() {
        if base != ch && base.is_ascii_lowercase() {
            let accent = decomposed.fold(0u32, |acc, mark| acc.wrapping_add(mark as u32));
            return (CLASS_LETTER | letter_rank(base), accent.max(1));
        }
    }

    if ch.is_alphabetic() {
        (CLASS_LETTER | (0x100 + ch as u32), 0)
    } else if ch.is_ascii() {
        (CLASS_PUNCT | ch as u32, 0)
    } else {
        (CLASS_OTHER | ch as u32, 0)
    }
}

fn letter_rank(ch: char) -> u32 {
    ch as u32 - 'a' as u32
}

fn is_combining_mark(ch: char) -> bool {
    matches!(ch as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by_key(|n| sort_key(n));
        names
    }

    #[test]
    fn swedish_letters_follow_z() {
        assert_eq!(
            sorted(vec!["Örebro", "Ånge", "Älvdalen", "Zinkgruvan", "Arboga"]),
            vec!["Arboga", "Zinkgruvan", "Ånge", "Älvdalen", "Örebro"]
        );
    }

    #[test]
    fn case_does_not_split_the_alphabet() {
        assert_eq!(compare("boden", "Borlänge"), Ordering::Less);
        assert_eq!(compare("Boden", "borlänge"), Ordering::Less);
    }

    #[test]
    fn lowercase_breaks_ties_first() {
        assert_eq!(compare("kalix", "Kalix"), Ordering::Less);
    }

    #[test]
    fn accents_fold_to_base_letter() {
        assert_eq!(compare("Hélsingborg", "Hjo"), Ordering::Less);
        assert_eq!(compare("Helsingborg", "Hélsingborg"), Ordering::Less);
    }

    #[test]
    fn digits_before_letters_and_space_before_digits() {
        assert_eq!(
            sorted(vec!["Alpha", "1 Beta", " Gamma"]),
            vec![" Gamma", "1 Beta", "Alpha"]
        );
    }

    #[test]
    fn equal_only_for_identical_strings() {
        assert_eq!(compare("Mora", "Mora"), Ordering::Equal);
        assert_ne!(compare("Mora", "MORA"), Ordering::Equal);
        assert_ne!(compare("Malmo", "Malmö"), Ordering::Equal);
    }

    #[test]
    fn decomposed_input_sorts_like_composed() {
        let composed = "Malmö";
        let decomposed = "Malmo\u{0308}";
        assert_eq!(sort_key(composed).primary, sort_key(decomposed).primary);
        assert_eq!(compare(decomposed, "Malmz"), Ordering::Greater);
        assert_eq!(compare(composed, "Malmz"), Ordering::Greater);
    }

    #[test]
    fn key_keeps_source() {
        assert_eq!(sort_key("Luleå").as_str(), "Luleå");
    }
}
