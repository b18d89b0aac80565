//! Running CRC-32 accumulators for the whole file and the current part

use crc32fast::Hasher;

/// Two independent CRC-32 states.
///
/// `whole` sees every byte that lands in the output buffer and is only reset
/// with the session. `part` sees the current part and is reset after its
/// trailer has been checked.
#[derive(Debug, Clone, Default)]
pub struct ChecksumTracker {
    whole: Hasher,
    part: Hasher,
}

impl ChecksumTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed decoded bytes into both accumulators
    pub fn update(&mut self, bytes: &[u8]) {
        self.whole.update(bytes);
        self.part.update(bytes);
    }

    /// Feed part bytes that are already in the output buffer
    pub fn update_part(&mut self, bytes: &[u8]) {
        self.part.update(bytes);
    }

    /// Feed zero-fill into the whole-file accumulator only
    pub fn update_whole(&mut self, bytes: &[u8]) {
        self.whole.update(bytes);
    }

    pub fn whole_checksum(&self) -> u32 {
        self.whole.clone().finalize()
    }

    pub fn part_checksum(&self) -> u32 {
        self.part.clone().finalize()
    }

    pub fn reset_part(&mut self) {
        self.part.reset();
    }

    pub fn reset(&mut self) {
        self.whole.reset();
        self.part.reset();
    }
}
