//! Prefix Fractions — counting with means
//!
//! For every position, the fraction of letters so far that are vowels. The
//! vowel flags come from elementwise comparisons against single codes; the
//! running fraction is one select (`indices >= indices`) and one aggregate.
//!
//! Run: cargo run --example prefix_fractions

use rasp::{library, Mask, Rasp, RaspError};

const VOWELS: &str = "aeiou";

fn main() -> rasp::Result<()> {
    let rasp = Rasp::new();
    let word = "sequence";
    let tokens = rasp.tokens(word)?;

    // Against a broadcast scalar, row i of the selector is set only where token i matches.
    let mut is_vowel = Mask::filled(tokens.len(), false);
    for vowel in VOWELS.chars() {
        let code = rasp::vocab::code_of(vowel).ok_or(RaspError::InvalidSymbol {
            symbol: vowel,
            position: 0,
        })?;
        let sel = rasp.select(&tokens, code, "==")?;
        let hits: Mask = sel.iter_rows().map(|row| row.iter().any(|&v| v)).collect();
        is_vowel = rasp.logical(&is_vowel, "or", Some(&hits))?;
    }

    let fractions = library::frac_prevs(&is_vowel)?;

    println!("=== Vowel fraction by prefix: \"{}\" ===", word);
    for ((symbol, flag), fraction) in word.chars().zip(is_vowel.iter()).zip(fractions.iter()) {
        println!(
            "  {}  vowel={:<5}  fraction={:.3}",
            symbol, flag, fraction
        );
    }

    Ok(())
}
