//! Per-category line transforms.
//!
//! Every transform is a pure function of a single line: applying it batch by
//! batch over a paragraph yields the same text as applying it to each line in
//! one pass, so worker job boundaries never affect output. Lines arrive
//! without their trailing newline and are returned the same way.

use itertools::Itertools;

use crate::category::Category;

/// A line transform strategy.
pub type LineTransform = fn(&str) -> String;

impl Category {
    /// The line-transform strategy for this category.
    #[must_use]
    pub fn transform(self) -> LineTransform {
        match self {
            Category::Horror => horror,
            Category::Comedy => comedy,
            Category::Fantasy => fantasy,
            Category::ScienceFiction => science_fiction,
        }
    }
}

/// Is this an ASCII consonant letter?
fn is_consonant(ch: char) -> bool {
    ch.is_ascii_alphabetic() && !matches!(ch.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Horror: copy every character, and follow each consonant letter with its
/// lowercase form.
fn horror(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    for ch in line.chars() {
        out.push(ch);
        if is_consonant(ch) {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

/// Comedy: within each space-delimited word, uppercase the characters at odd
/// 0-based positions. The position counter resets at every space; characters
/// other than letters are left untouched.
fn comedy(line: &str) -> String {
    line.split(' ')
        .map(|word| {
            word.chars()
                .enumerate()
                .map(|(i, ch)| if i % 2 == 1 { ch.to_ascii_uppercase() } else { ch })
                .collect::<String>()
        })
        .join(" ")
}

/// Fantasy: uppercase the first alphabetic character of each space-delimited
/// word, leaving everything else unchanged.
fn fantasy(line: &str) -> String {
    line.split(' ')
        .map(|word| {
            let mut done = false;
            word.chars()
                .map(|ch| {
                    if !done && ch.is_ascii_alphabetic() {
                        done = true;
                        ch.to_ascii_uppercase()
                    } else {
                        ch
                    }
                })
                .collect::<String>()
        })
        .join(" ")
}

/// Science fiction: reverse the character order of every 7th space-delimited
/// token (0-based indices 6, 13, 20, ...) and rejoin with single spaces.
/// Assumes single-space-delimited tokens; irregular spacing is not normalized.
fn science_fiction(line: &str) -> String {
    line.split(' ')
        .enumerate()
        .map(|(i, token)| {
            if (i + 1) % 7 == 0 { token.chars().rev().collect::<String>() } else { token.to_string() }
        })
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horror_doubles_consonants() {
        // h -> "hh", e -> "e", l -> "ll", l -> "ll", o -> "o"
        assert_eq!(horror("hello"), "hhellllo");
        assert_eq!(horror("aeiou"), "aeiou");
        assert_eq!(horror("B"), "Bb");
        assert_eq!(horror(""), "");
    }

    #[test]
    fn test_horror_leaves_punctuation_alone() {
        assert_eq!(horror("a-b!"), "a-bb!");
    }

    #[test]
    fn test_comedy_alternates_within_words() {
        assert_eq!(comedy("ab cd"), "aB cD");
        assert_eq!(comedy("abcd"), "aBcD");
        assert_eq!(comedy("a b c"), "a b c");
    }

    #[test]
    fn test_comedy_resets_at_spaces() {
        // The alternation index restarts on every word.
        assert_eq!(comedy("abc abc"), "aBc aBc");
    }

    #[test]
    fn test_comedy_preserves_word_boundaries() {
        assert_eq!(comedy("ab  cd"), "aB  cD");
        assert_eq!(comedy(""), "");
    }

    #[test]
    fn test_fantasy_capitalizes_words() {
        assert_eq!(fantasy("the quick fox"), "The Quick Fox");
        assert_eq!(fantasy("already Upper"), "Already Upper");
    }

    #[test]
    fn test_fantasy_skips_leading_punctuation() {
        assert_eq!(fantasy("'tis a test"), "'Tis A Test");
        assert_eq!(fantasy("123 abc"), "123 Abc");
    }

    #[test]
    fn test_science_fiction_reverses_every_seventh_token() {
        let line = "one two three four five six seven eight";
        assert_eq!(science_fiction(line), "one two three four five six neves eight");
    }

    #[test]
    fn test_science_fiction_short_lines_unchanged() {
        assert_eq!(science_fiction("one two three"), "one two three");
        assert_eq!(science_fiction(""), "");
    }

    #[test]
    fn test_science_fiction_reverses_indices_6_13() {
        let tokens: Vec<String> = (0..14).map(|i| format!("t{i:02}")).collect();
        let out = science_fiction(&tokens.join(" "));
        let out_tokens: Vec<&str> = out.split(' ').collect();
        assert_eq!(out_tokens[6], "60t");
        assert_eq!(out_tokens[13], "31t");
        assert_eq!(out_tokens[0], "t00");
        assert_eq!(out_tokens[12], "t12");
    }

    #[test]
    fn test_transforms_are_batch_independent() {
        // Transforms are line-local, so any batching of a paragraph's lines
        // must produce the same text as a single whole-paragraph pass.
        let lines = ["the dark woods", "a second line", "and a third", "one more"];
        for category in Category::ALL {
            let f = category.transform();
            let whole: Vec<String> = lines.iter().map(|l| f(l)).collect();
            for batch_size in 1..=lines.len() {
                let batched: Vec<String> =
                    lines.chunks(batch_size).flat_map(|b| b.iter().map(|l| f(l))).collect();
                assert_eq!(batched, whole, "batch size {batch_size} changed output");
            }
        }
    }
}
