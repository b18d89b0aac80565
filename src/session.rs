//! State carried across decode calls for one logical file

use crate::checksum::ChecksumTracker;
use crate::header::{YencHeader, YencPart};

/// Everything the decoder remembers between inputs of one logical file.
///
/// Created empty, filled by each header, grown by each part, cleared by
/// [`MultipartSession::initialize`].
#[derive(Debug, Clone, Default)]
pub struct MultipartSession {
    pub(crate) expected_name: Option<String>,
    pub(crate) declared_line_len: usize,
    pub(crate) declared_size: usize,
    pub(crate) declared_part: Option<u32>,
    pub(crate) declared_part_size: usize,
    pub(crate) declared_total_parts: Option<u32>,
    pub(crate) checksums: ChecksumTracker,
    pub(crate) output: Vec<u8>,
}

impl MultipartSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, ready for an unrelated file
    pub fn initialize(&mut self) {
        self.expected_name = None;
        self.declared_line_len = 0;
        self.declared_size = 0;
        self.declared_part = None;
        self.declared_part_size = 0;
        self.declared_total_parts = None;
        self.checksums.reset();
        self.output.clear();
    }

    /// Record the declared fields of a freshly parsed header
    pub(crate) fn declare(&mut self, header: &YencHeader, part: Option<&YencPart>) {
        self.declared_line_len = header.line_len;
        self.declared_size = header.size;
        self.declared_part = header.part;
        self.declared_total_parts = header.total;
        self.declared_part_size = part.map_or(header.size, YencPart::size);
    }

    /// Append decoded bytes of the current part
    pub(crate) fn append_part(&mut self, bytes: &[u8]) {
        self.checksums.update(bytes);
        self.output.extend_from_slice(bytes);
    }

    /// Append a part whose first `overlap` bytes are already in the output
    /// buffer. Only the part checksum sees the overlapping bytes.
    pub(crate) fn append_part_after(&mut self, bytes: &[u8], overlap: usize) {
        let (seen, fresh) = bytes.split_at(overlap.min(bytes.len()));
        self.checksums.update_part(seen);
        self.append_part(fresh);
    }

    /// Append `len` zero bytes that belong to no decoded part
    pub(crate) fn zero_fill(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let zeros = vec![0u8; len];
        self.checksums.update_whole(&zeros);
        self.output.extend_from_slice(&zeros);
    }

    /// Filename from the first header, if any
    pub fn name(&self) -> Option<&str> {
        self.expected_name.as_deref()
    }

    /// Bytes decoded so far
    pub fn data(&self) -> &[u8] {
        &self.output
    }

    pub fn declared_line_len(&self) -> usize {
        self.declared_line_len
    }

    /// Whole-file size from the last header
    pub fn declared_size(&self) -> usize {
        self.declared_size
    }

    pub fn declared_part(&self) -> Option<u32> {
        self.declared_part
    }

    /// Size of the last part, or the whole-file size for single-part input
    pub fn declared_part_size(&self) -> usize {
        self.declared_part_size
    }

    pub fn declared_total_parts(&self) -> Option<u32> {
        self.declared_total_parts
    }

    pub fn whole_crc(&self) -> u32 {
        self.checksums.whole_checksum()
    }
}
