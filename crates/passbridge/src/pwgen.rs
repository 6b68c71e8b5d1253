//! Password-generation collaborator.
//!
//! The dispatcher treats generation as an opaque capability behind the
//! [`PasswordGenerator`] trait; the default implementation draws uniformly
//! from character classes. Only the observable contract matters to the
//! protocol: `length` characters, word characters only unless symbols are
//! requested.

use rand::Rng;
use rand::seq::SliceRandom;

/// Letters and digits, the base character class.
const WORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Punctuation added when symbols are requested.
const SYMBOL_CHARS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[]^_{|}~";

/// Produces passwords for `create` requests that ask for generation.
pub trait PasswordGenerator {
    /// Generates a password of `length` characters.
    ///
    /// With `use_symbols` the pool widens from letters and digits to
    /// include punctuation.
    fn generate(&self, length: usize, use_symbols: bool) -> String;
}

/// Uniform character-class generator backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharClassGenerator;

impl PasswordGenerator for CharClassGenerator {
    fn generate(&self, length: usize, use_symbols: bool) -> String {
        let mut rng = rand::thread_rng();
        let pool: Vec<u8> = if use_symbols {
            [WORD_CHARS, SYMBOL_CHARS].concat()
        } else {
            WORD_CHARS.to_vec()
        };
        (0..length)
            .map(|_| {
                let fallback = rng.gen_range(b'a'..=b'z');
                char::from(*pool.choose(&mut rng).unwrap_or(&fallback))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let generator = CharClassGenerator;
        for length in [0, 1, 12, 64] {
            assert_eq!(generator.generate(length, false).chars().count(), length);
            assert_eq!(generator.generate(length, true).chars().count(), length);
        }
    }

    #[test]
    fn word_class_stays_alphanumeric() {
        let generator = CharClassGenerator;
        let password = generator.generate(256, false);
        assert!(password.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }

    #[test]
    fn symbol_class_stays_printable_ascii() {
        let generator = CharClassGenerator;
        let password = generator.generate(256, true);
        assert!(
            password
                .chars()
                .all(|ch| ch.is_ascii_graphic())
        );
    }

    #[test]
    fn consecutive_passwords_differ() {
        let generator = CharClassGenerator;
        assert_ne!(generator.generate(32, true), generator.generate(32, true));
    }
}
