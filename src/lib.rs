//! # Re-Pair grammar compression in bounded memory
//!
//! A Rust implementation of the Re-Pair algorithm — the greedy grammar
//! compressor that repeatedly replaces the most frequent pair of adjacent
//! symbols with a new rule — under a hard memory bound: all working state
//! shares one preallocated arena of `input length + slack` symbol cells.
//!
//! The sequence occupies the arena's prefix and shrinks in place; the
//! suffix is viewed as two bounded frequency tables that estimate the top
//! bigrams each round; the cells freed by replacement are borrowed within a
//! turn to seed candidate bigrams around each new non-terminal. Because the
//! tables are bounded by the slack rather than the input, counting is
//! approximate: each round re-estimates exactly, and replacement turns
//! decay the counts in place.
//!
//! ## Example
//!
//! ```
//! use repair_rs::Repair;
//!
//! let repair = Repair::new(b"abcabcabcabc", 200).unwrap();
//! let grammar = repair.compress().unwrap();
//!
//! // The grammar is a rule list plus a start sequence, and expands back
//! // to the original input.
//! assert_eq!(grammar.decode(), b"abcabcabcabc");
//! println!("{} rules", grammar.rules.len());
//! ```
//!
//! ## Limits
//!
//! Symbols are 16 bits wide: inputs are byte sequences, and compression
//! fails cleanly with [`Error::SymbolOverflow`] if it would need more
//! non-terminals than the width allows. The whole input must fit in the
//! arena — there is no streaming mode.

mod arena;
mod bigram;
mod entry;
mod estimator;
mod grammar;
mod repair;
mod replacer;
mod table;

#[cfg(test)]
mod tests;

pub use bigram::{Bigram, Symbol, MAX_SYMBOL, SYMBOL_BITS};
pub use grammar::{Grammar, GrammarStats, Rule};
pub use repair::{Error, Repair};
