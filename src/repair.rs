//! The Re-Pair compressor driver.
//!
//! Control flow: an outer round loop re-estimates bigram frequencies
//! against the current sequence, then an inner turn loop replaces the
//! max-frequency bigram until the best survivor falls below the round's
//! threshold. Compression ends when a freshly estimated table has no
//! bigram of frequency 2.
//!
//! # Example
//!
//! ```
//! use repair_rs::Repair;
//!
//! let repair = Repair::new(b"abcabcabcabc", 200).unwrap();
//! let grammar = repair.compress().unwrap();
//!
//! assert!(!grammar.rules.is_empty());
//! assert_eq!(grammar.decode(), b"abcabcabcabc");
//! ```

use crate::arena::Arena;
use crate::bigram::{make_bigram, Symbol, MAX_SYMBOL};
use crate::estimator;
use crate::grammar::{Grammar, Rule};
use crate::replacer;
use crate::table::FrequencyTable;
use log::{debug, trace};
use thiserror::Error;

/// Compression error.
///
/// Both variants are capacity faults: the caller configured an arena or a
/// symbol space too small for the input, and no partial grammar is emitted.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("memory slack holds {available} table entries, need at least {needed}")]
    SlackTooSmall { available: usize, needed: usize },

    #[error("non-terminal space exhausted: next symbol would exceed {limit}")]
    SymbolOverflow { limit: Symbol },
}

/// A single-use Re-Pair compressor.
///
/// Owns the arena for its whole lifetime and is consumed by
/// [`compress`](Repair::compress); there is no shared or global state.
#[derive(Debug)]
pub struct Repair {
    arena: Arena,
    /// Largest symbol value handed out so far; the next non-terminal is
    /// one above it.
    maximum_character: Symbol,
    first_nonterminal: Symbol,
    rules: Vec<Rule>,
    rounds: usize,
    input_len: usize,
}

impl Repair {
    /// Creates a compressor over `input` with `slack_bytes` of working
    /// memory beyond the text itself.
    ///
    /// The slack must hold at least three table entries (24 bytes).
    pub fn new(input: &[u8], slack_bytes: usize) -> Result<Self, Error> {
        let arena = Arena::new(input, slack_bytes)?;
        let maximum_character = input.iter().copied().max().map_or(0, Symbol::from);
        Ok(Self {
            arena,
            maximum_character,
            first_nonterminal: maximum_character + 1,
            rules: Vec::new(),
            rounds: 0,
            input_len: input.len(),
        })
    }

    /// Number of symbols in the current sequence.
    pub fn len(&self) -> usize {
        self.arena.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.text_len() == 0
    }

    /// Runs the compression to completion and returns the grammar.
    pub fn compress(mut self) -> Result<Grammar, Error> {
        loop {
            if self.arena.text_len() < 2 {
                break;
            }

            self.estimate_round();
            let (max_freq, min_freq) = self.round_thresholds();
            if max_freq < 2 {
                break;
            }

            // Captured once per round: entries decayed below it are evicted,
            // and the turn loop stops once the best survivor falls under it.
            let min_frequency = min_freq.max(2);
            debug!(
                "round {}: length {}, max frequency {}, threshold {}",
                self.rounds,
                self.arena.text_len(),
                max_freq,
                min_frequency
            );

            let mut max = max_freq;
            while max >= min_frequency {
                max = self.turn(min_frequency)?;
            }

            // A survivor of frequency 2 or more still pays for a rule; it
            // seeds the next full re-estimation.
            if max < 2 {
                break;
            }
        }

        debug!(
            "done: {} rules over {} rounds, start sequence length {}",
            self.rules.len(),
            self.rounds,
            self.arena.text_len()
        );
        Ok(self.into_grammar())
    }

    fn estimate_round(&mut self) {
        self.arena.begin_round();
        let (text, entries) = self.arena.text_and_entries();
        estimator::populate(text, entries);
        self.rounds += 1;
    }

    /// Main-table max frequency and min valid frequency after estimation.
    fn round_thresholds(&mut self) -> (u32, u32) {
        let (_, entries) = self.arena.text_and_entries();
        let half = entries.len() / 2;
        let main = FrequencyTable::new(&mut entries[..half]);
        let max_freq = main.get(main.max()).freq;
        let min_freq = main.min().map_or(0, |pos| main.get(pos).freq);
        (max_freq, min_freq)
    }

    /// One substitution turn. Returns the main-table maximum afterwards.
    fn turn(&mut self, min_frequency: u32) -> Result<u32, Error> {
        let x = self.next_nonterminal()?;

        let max_entry = {
            let (text, entries) = self.arena.text_and_entries();
            let half = entries.len() / 2;
            let mut main = FrequencyTable::new(&mut entries[..half]);

            let max_index = main.max();
            let max_entry = main.get(max_index);
            let replaced =
                replacer::substitute(text, &mut main, max_entry.bigram, x, min_frequency);

            // The table promised exactly this many occurrences.
            assert_eq!(
                replaced as u32, max_entry.freq,
                "replacement count diverged from the frequency table"
            );
            main.clear_at(max_index);
            max_entry
        };

        trace!("rule {} -> ({}, {})", x, max_entry.first(), max_entry.second());
        self.rules.push(Rule {
            lhs: x,
            first: max_entry.first(),
            second: max_entry.second(),
        });
        self.arena.shrink(max_entry.freq as usize);

        // Seed candidate bigrams around the new non-terminal from the
        // freed tail.
        let (text, dbuf, entries) = self.arena.text_dbuf_entries();
        let half = entries.len() / 2;
        let mut main = FrequencyTable::new(&mut entries[..half]);

        let d_len = replacer::collect_left(text, dbuf, x);
        debug_assert!(d_len <= max_entry.freq as usize);
        replacer::seed_candidates(&mut dbuf[..d_len], &mut main, |c| make_bigram(c, x));

        let d_len = replacer::collect_right(text, dbuf, x);
        debug_assert!(d_len <= max_entry.freq as usize);
        replacer::seed_candidates(&mut dbuf[..d_len], &mut main, |c| make_bigram(x, c));

        Ok(main.get(main.max()).freq)
    }

    fn next_nonterminal(&mut self) -> Result<Symbol, Error> {
        if self.maximum_character >= MAX_SYMBOL {
            return Err(Error::SymbolOverflow { limit: MAX_SYMBOL });
        }
        self.maximum_character += 1;
        Ok(self.maximum_character)
    }

    fn into_grammar(self) -> Grammar {
        Grammar::new(
            self.rules,
            self.arena.text().to_vec(),
            self.first_nonterminal,
            self.maximum_character,
            self.input_len,
            self.rounds,
        )
    }

    /// Rigs the non-terminal counter, for exercising the overflow path
    /// without a four-gigasymbol input.
    #[cfg(test)]
    pub(crate) fn set_maximum_character(&mut self, value: Symbol) {
        self.maximum_character = value;
    }
}
