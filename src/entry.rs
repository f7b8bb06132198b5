use crate::bigram::{bigram_first, bigram_second, Bigram, Symbol};

/// Symbol cells occupied by one packed entry record.
pub(crate) const ENTRY_CELLS: usize = 2;

/// Bytes occupied by one packed entry record. The arena-sizing arithmetic
/// depends on this density: two 32-bit fields, no padding.
pub(crate) const ENTRY_BYTES: usize = ENTRY_CELLS * std::mem::size_of::<Symbol>();

/// A frequency-table record: a bigram key and its count.
///
/// `freq == 0` marks an empty slot. This is the only validity sentinel;
/// there is no separate occupancy bit, so a valid entry always has
/// `freq >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Entry {
    pub bigram: Bigram,
    pub freq: u32,
}

impl Entry {
    /// Whether this slot holds a live entry.
    #[inline]
    pub fn valid(&self) -> bool {
        self.freq > 0
    }

    /// First symbol of the stored bigram.
    #[inline]
    pub fn first(&self) -> Symbol {
        bigram_first(self.bigram)
    }

    /// Second symbol of the stored bigram.
    #[inline]
    pub fn second(&self) -> Symbol {
        bigram_second(self.bigram)
    }
}
