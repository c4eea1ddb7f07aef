//! Reverse Words — select/aggregate as a position permutation
//!
//! A batch of words is encoded, padded, and reversed through the flip
//! selector. The selector is printed so the anti-diagonal is visible.
//!
//! Run: cargo run --example reverse_words

use rasp::{library, vocab, Rasp, Selector};

// =============================================================================
// Helpers
// =============================================================================

fn print_selector(sel: &Selector) {
    for row in sel.iter_rows() {
        let line: String = row.iter().map(|&v| if v { '1' } else { '.' }).collect();
        println!("    {}", line);
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> rasp::Result<()> {
    let rasp = Rasp::new();
    let words = ["rasp", "attention", "select", "aggregate"];

    println!("=== Encoding ===");
    let batch = rasp.tokens_batch(&words)?;
    println!("  batch: {} rows x {} columns", batch.len(), batch.width());
    for (word, row) in words.iter().zip(batch.rows()) {
        println!("  {:<10} -> {:?}", word, row.data());
    }

    println!("\n=== Flip selector for \"{}\" ===", words[0]);
    let tokens = rasp.tokens(words[0])?;
    print_selector(&library::flip_selector(&tokens)?);

    println!("\n=== Reversed ===");
    for word in words {
        let tokens = rasp.tokens(word)?;
        let reversed = rasp.flip(&tokens)?;
        println!("  {:<10} -> {}", word, vocab::decode(&reversed, false)?);
    }

    Ok(())
}
