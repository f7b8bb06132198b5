//! Round-level bigram frequency estimation.
//!
//! Populates the main table with (approximately) the most frequent bigrams
//! of the current sequence. The walk discovers unseen bigrams into the
//! helper table without counting them; whenever the helper fills, or the
//! walk is about to end, a spill pass counts every helper bigram across the
//! whole sequence under the run-parity rule and a descending sort over the
//! unified region promotes the strongest candidates into the main half.
//!
//! After a completed walk, every valid main-table entry holds the true
//! run-parity frequency of its bigram at estimation time. With more
//! distinct bigrams than the table can hold, the weakest candidates are
//! dropped at each promotion; a later round re-estimates against the
//! shorter sequence, refining the approximation.

use crate::bigram::{make_bigram, Symbol};
use crate::table::FrequencyTable;

/// Fills the entry region from the current sequence.
///
/// The lower half of `cells` is the main table afterwards; the upper half
/// (the helper) is left cleared.
pub(crate) fn populate(text: &[Symbol], cells: &mut [Symbol]) {
    FrequencyTable::new(cells).clear();
    if text.len() < 2 {
        return;
    }

    let half = cells.len() / 2;
    let last = text.len() - 2;
    let mut i = 0;
    while i <= last {
        let filled = {
            let (main_cells, helper_cells) = cells.split_at_mut(half);
            let main = FrequencyTable::new(main_cells);
            let mut helper = FrequencyTable::new(helper_cells);
            let bigram = make_bigram(text[i], text[i + 1]);
            if helper.find(bigram).is_none() && main.find(bigram).is_none() {
                // Every spill clears the helper, so a free slot must exist.
                let pos = helper
                    .insert(bigram)
                    .expect("helper table full at discovery");
                pos + 1 == helper.len()
            } else {
                false
            }
        };
        if filled || i == last {
            spill(text, cells);
        }
        i += 1;
    }
}

/// Counts the helper's bigrams over the whole sequence, cancels the +1 each
/// discovery insert recorded, then promotes by sorting the unified region.
fn spill(text: &[Symbol], cells: &mut [Symbol]) {
    let half = cells.len() / 2;
    {
        let mut helper = FrequencyTable::new(&mut cells[half..]);
        count_occurrences(text, &mut helper);
        for pos in 0..helper.len() {
            if helper.get(pos).valid() {
                helper.decrement(pos);
            }
        }
    }

    FrequencyTable::new(cells).sort_by_frequency();
    FrequencyTable::new(&mut cells[half..]).clear();
}

/// One counting pass: every helper bigram found in `text` is incremented.
///
/// Within a maximal run of equal symbols only every second position counts,
/// so a run of length `l` contributes `l / 2` occurrences of its `(a,a)`
/// pair rather than `l - 1`.
fn count_occurrences(text: &[Symbol], helper: &mut FrequencyTable<'_>) {
    let mut run_start = 0;
    for j in 0..text.len() - 1 {
        if text[j] != text[run_start] {
            run_start = j;
        }
        if text[j] == text[j + 1] && (j - run_start) % 2 == 1 {
            continue;
        }
        if let Some(pos) = helper.find(make_bigram(text[j], text[j + 1])) {
            helper.increment(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, ENTRY_CELLS};

    fn text_of(input: &[u8]) -> Vec<Symbol> {
        input.iter().map(|&b| Symbol::from(b)).collect()
    }

    /// Runs a full estimation with `table_len` slots per half and returns
    /// the valid main-table entries.
    fn estimate(input: &[u8], table_len: usize) -> Vec<Entry> {
        let text = text_of(input);
        let mut cells = vec![0; table_len * 2 * ENTRY_CELLS];
        populate(&text, &mut cells);

        let table = FrequencyTable::new(&mut cells[..table_len * ENTRY_CELLS]);
        (0..table.len())
            .map(|pos| table.get(pos))
            .filter(Entry::valid)
            .collect()
    }

    fn freq_of(entries: &[Entry], first: Symbol, second: Symbol) -> Option<u32> {
        entries
            .iter()
            .find(|e| e.bigram == make_bigram(first, second))
            .map(|e| e.freq)
    }

    #[test]
    fn test_simple_counts() {
        let entries = estimate(b"abcabc", 8);
        assert_eq!(freq_of(&entries, 97, 98), Some(2)); // ab
        assert_eq!(freq_of(&entries, 98, 99), Some(2)); // bc
        assert_eq!(freq_of(&entries, 99, 97), Some(1)); // ca
    }

    #[test]
    fn test_run_parity_even_run() {
        // "aaaa": the aa pair counts 2, not 3.
        let entries = estimate(b"aaaa", 4);
        assert_eq!(freq_of(&entries, 97, 97), Some(2));
    }

    #[test]
    fn test_run_parity_odd_run() {
        // "aaaaa": still 2 under floor division.
        let entries = estimate(b"aaaaa", 4);
        assert_eq!(freq_of(&entries, 97, 97), Some(2));
    }

    #[test]
    fn test_run_parity_split_runs() {
        // Two separate runs of 3 and 2: floor(3/2) + floor(2/2) = 2.
        let entries = estimate(b"aaabaa", 8);
        assert_eq!(freq_of(&entries, 97, 97), Some(2));
        assert_eq!(freq_of(&entries, 97, 98), Some(1)); // ab
        assert_eq!(freq_of(&entries, 98, 97), Some(1)); // ba
    }

    #[test]
    fn test_single_slot_helper_still_counts_exactly() {
        // With one slot per half, every discovery spills immediately; the
        // surviving candidate must still carry its exact count.
        let entries = estimate(b"abababab", 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(freq_of(&entries, 97, 98), Some(4)); // ab beats ba
    }

    #[test]
    fn test_keeps_strongest_candidates_under_pressure() {
        // Four distinct bigrams, two slots: the two strongest must survive.
        let entries = estimate(b"ababab_cd", 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(freq_of(&entries, 97, 98), Some(3)); // ab
        assert_eq!(freq_of(&entries, 98, 97), Some(2)); // ba
    }

    #[test]
    fn test_short_sequences() {
        assert!(estimate(b"", 4).is_empty());
        assert!(estimate(b"a", 4).is_empty());

        let entries = estimate(b"ab", 4);
        assert_eq!(freq_of(&entries, 97, 98), Some(1));
    }

    #[test]
    fn test_helper_left_clear_after_walk() {
        let text = text_of(b"abcabc");
        let mut cells = vec![0; 4 * 2 * ENTRY_CELLS];
        populate(&text, &mut cells);

        let helper = FrequencyTable::new(&mut cells[4 * ENTRY_CELLS..]);
        assert_eq!(helper.min(), None);
    }
}
