//! Decode status flags and decoding modes

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Outcome of a decode call.
    ///
    /// Each flag is an independent condition; one pass may raise several.
    /// The empty set is [`Status::SUCCESS`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// Whole-file CRC-32 does not match the trailer's `crc32`
        const CRC_MISMATCH = 1 << 0;
        /// Part CRC-32 does not match the trailer's `pcrc32`
        const PART_CRC_MISMATCH = 1 << 1;
        /// Trailer `part` differs from header `part`
        const PART_MISMATCH = 1 << 2;
        /// Declared or decoded size disagrees
        const SIZE_MISMATCH = 1 << 3;
        /// Header `name` differs from earlier parts
        const NAME_MISMATCH = 1 << 4;
        /// Unrecoverable: unreadable input or missing mandatory fields
        const FAILED = 1 << 5;
    }
}

impl Status {
    /// No flag raised
    pub const SUCCESS: Status = Status::empty();

    pub fn is_success(&self) -> bool {
        self.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        self.contains(Status::FAILED)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::SUCCESS
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("SUCCESS");
        }
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// How the decoder reacts to violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Stop processing an input at the first violation
    #[default]
    Strict,
    /// Record violations, keep going, zero-fill what cannot be recovered
    Force,
}
