//! yEnc decoding functionality

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::consts::{ESCAPE_CHAR, ESCAPE_OFFSET, OFFSET, YBEGIN, YEND};
use crate::error::{Result, YencError};
use crate::header::{YencHeader, YencPart, YencTrailer};
use crate::notify::{Channel, Notifier, SubscriptionId};
use crate::session::MultipartSession;
use crate::status::{DecodeMode, Status};

/// Upper bound on buffer space reserved up front from a declared size
const MAX_PREALLOC: usize = 1 << 24;

/// Decode a single yEnc-encoded byte
#[inline]
fn decode_byte(byte: u8) -> u8 {
    byte.wrapping_sub(OFFSET)
}

/// Decode one line of yEnc data, appending the raw bytes to `out`.
///
/// CR and LF are skipped. `escaped` carries an escape marker that ended the
/// previous line over to this one.
pub fn decode_line(line: &[u8], escaped: &mut bool, out: &mut Vec<u8>) {
    for &byte in line {
        if byte == b'\r' || byte == b'\n' {
            continue;
        }
        if *escaped {
            *escaped = false;
            out.push(decode_byte(byte.wrapping_sub(ESCAPE_OFFSET)));
        } else if byte == ESCAPE_CHAR {
            *escaped = true;
        } else {
            out.push(decode_byte(byte));
        }
    }
}

/// Read the next line, newline included. Returns `false` at end of input.
fn next_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> std::io::Result<bool> {
    line.clear();
    Ok(reader.read_until(b'\n', line)? > 0)
}

/// Stateful yEnc decoder.
///
/// Call [`Decoder::decode_file`] once per input belonging to the same logical
/// file, in part order, then [`Decoder::write`]. Call
/// [`Decoder::reinitialize`] before starting on an unrelated file.
///
/// The decoder is not meant to be shared: calls on one instance must be
/// sequenced by the caller.
///
/// # Example
/// ```
/// use ydecode::{Decoder, Status};
///
/// let input = b"=ybegin line=128 size=5 name=test.bin\n*+,-=n\n=yend size=5 crc32=515ad3cc\n";
/// let mut decoder = Decoder::new();
///
/// assert_eq!(decoder.decode(&input[..]), Status::SUCCESS);
/// assert_eq!(decoder.session().data(), &[0, 1, 2, 3, 4]);
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    mode: DecodeMode,
    skip_crc: bool,
    pub(crate) session: MultipartSession,
    pub(crate) notifier: Notifier,
}

impl Decoder {
    /// Create a new decoder with default settings
    ///
    /// Default settings:
    /// - Strict mode
    /// - CRC validation enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep going past violations and zero-fill missing data
    pub fn force(self) -> Self {
        self.mode(DecodeMode::Force)
    }

    pub fn mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Disable CRC validation
    ///
    /// By default, `pcrc32` and `crc32` are validated if present in the trailer.
    pub fn no_crc_check(mut self) -> Self {
        self.skip_crc = true;
        self
    }

    pub fn set_mode(&mut self, mode: DecodeMode) {
        self.mode = mode;
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.mode
    }

    pub fn session(&self) -> &MultipartSession {
        &self.session
    }

    pub fn subscribe<F>(&mut self, channel: Channel, observer: F) -> SubscriptionId
    where
        F: FnMut(&str) + 'static,
    {
        self.notifier.subscribe(channel, observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Reset the session. Do not call this between parts of one multipart file.
    pub fn reinitialize(&mut self) {
        self.session.initialize();
    }

    /// Decode one yEnc-encoded file into the session
    pub fn decode_file<P: AsRef<Path>>(&mut self, input: P) -> Status {
        let input = input.as_ref();
        self.notifier.progress(&format!("Decoding {}", input.display()));

        match File::open(input) {
            Ok(file) => self.decode(file),
            Err(err) => {
                self.notifier.error(&format!("Failed to open file {}: {}", input.display(), err));
                Status::FAILED
            }
        }
    }

    /// Decode every `=ybegin` section found in `reader` into the session
    pub fn decode<R: Read>(&mut self, reader: R) -> Status {
        match self.decode_sections(BufReader::new(reader)) {
            Ok(status) => status,
            Err(err) => {
                self.notifier.error(&format!("Failed to read input: {}", err));
                Status::FAILED
            }
        }
    }

    /// Zero-fill the output up to the size declared by the last header.
    ///
    /// Returns the number of bytes added.
    pub fn pad_to_declared_size(&mut self) -> usize {
        let missing = self
            .session
            .declared_size
            .saturating_sub(self.session.output.len());
        if missing > 0 {
            self.notifier.warning(&format!(
                "Output is {} bytes short of the declared {}, filling with zeros",
                missing, self.session.declared_size
            ));
            self.session.zero_fill(missing);
        }
        missing
    }

    fn decode_sections<R: BufRead>(&mut self, mut reader: R) -> Result<Status> {
        let mut status = Status::SUCCESS;
        let mut line = Vec::new();
        let mut found = false;
        let mut held = false;

        loop {
            if !held && !next_line(&mut reader, &mut line)? {
                break;
            }
            if !line.starts_with(YBEGIN.as_bytes()) {
                continue;
            }
            found = true;

            let (section, next_section) = self.decode_section(&mut reader, &mut line)?;
            held = next_section;
            status |= section;
            if section.is_failed() || (self.mode == DecodeMode::Strict && !section.is_success()) {
                break;
            }
        }

        if !found {
            self.notifier.error("No =ybegin header found");
            status |= Status::FAILED;
        }
        Ok(status)
    }

    /// Decode one section; `line` holds its `=ybegin` line on entry.
    ///
    /// Also returns whether the section was cut short by the next section's
    /// `=ybegin` line, which is then left in `line`.
    fn decode_section<R: BufRead>(
        &mut self,
        reader: &mut R,
        line: &mut Vec<u8>,
    ) -> Result<(Status, bool)> {
        let (header, part) = match self.read_header(reader, line) {
            Ok(parsed) => parsed,
            Err(YencError::Io(err)) => return Err(YencError::Io(err)),
            Err(err) => {
                self.notifier.error(&format!("Failed to parse header: {}", err));
                return Ok((Status::FAILED, false));
            }
        };

        let mut status = self.check_name(&header);
        if !status.is_success() && self.mode == DecodeMode::Strict {
            return Ok((status, false));
        }

        let mut overlap = 0;
        if let Some(part) = &part {
            let (placement, skip) = self.prepare_part(&header, part);
            if !placement.is_success() {
                return Ok((status | placement, false));
            }
            overlap = skip;
        }
        self.session.declare(&header, part.as_ref());

        let mut decoded = Vec::with_capacity(self.session.declared_part_size.min(MAX_PREALLOC));
        let mut escaped = false;
        let mut trailer_line = None;
        let mut next_section = false;
        while next_line(reader, line)? {
            if line.starts_with(YEND.as_bytes()) {
                trailer_line = Some(String::from_utf8_lossy(line).into_owned());
                break;
            }
            if line.starts_with(YBEGIN.as_bytes()) {
                next_section = true;
                break;
            }
            decode_line(line, &mut escaped, &mut decoded);
        }

        if escaped {
            self.notifier.warning("Data ended with an escape character, discarded");
        }

        let trailer = match trailer_line.as_deref().map(YencTrailer::parse) {
            Some(Ok(trailer)) => Some(trailer),
            Some(Err(err)) => {
                self.notifier.error(&format!("Failed to parse trailer: {}", err));
                None
            }
            None => {
                self.notifier.error(&format!("Missing =yend trailer for {}", header.name));
                None
            }
        };

        let Some(trailer) = trailer else {
            if self.mode == DecodeMode::Strict {
                return Ok((status | Status::FAILED, next_section));
            }
            if decoded.len() != self.session.declared_part_size {
                status |= Status::SIZE_MISMATCH;
            }
            self.session.append_part_after(&decoded, overlap);
            self.finish_part(&header, decoded.len());
            return Ok((status, next_section));
        };

        self.session.append_part_after(&decoded, overlap);
        status |= self.validate_trailer(&header, &trailer, decoded.len());
        self.finish_part(&header, decoded.len());

        Ok((status, false))
    }

    /// Parse the `=ybegin` line in `line` and, for multipart input, the
    /// `=ypart` line that follows it
    fn read_header<R: BufRead>(
        &mut self,
        reader: &mut R,
        line: &mut Vec<u8>,
    ) -> Result<(YencHeader, Option<YencPart>)> {
        let header = YencHeader::parse(&String::from_utf8_lossy(line))?;

        if let Some(part) = header.part {
            self.notifier.debug(&format!("part : {}", part));
        }
        self.notifier.debug(&format!("line : {}", header.line_len));
        self.notifier.debug(&format!("size : {}", header.size));
        self.notifier.debug(&format!("Found name : {}", header.name));

        if !header.is_multipart() {
            return Ok((header, None));
        }

        if !next_line(reader, line)? {
            return Err(YencError::InvalidHeader(
                "Header indicates multi-part but input ended".to_string(),
            ));
        }
        let part = YencPart::parse(&String::from_utf8_lossy(line))?;
        self.notifier.debug(&format!("part size : {}", part.size()));
        if let Some(total) = header.total {
            self.notifier.debug(&format!("total parts : {}", total));
        }

        Ok((header, Some(part)))
    }

    fn check_name(&mut self, header: &YencHeader) -> Status {
        let Some(expected) = &self.session.expected_name else {
            self.session.expected_name = Some(header.name.clone());
            return Status::SUCCESS;
        };
        if *expected == header.name {
            return Status::SUCCESS;
        }

        let msg = format!(
            "Name mismatch: expected {}, found {}",
            expected, header.name
        );
        self.notifier.warning(&msg);
        Status::NAME_MISMATCH
    }

    /// Report progress and check where the part lands in the output.
    ///
    /// Returns the placement status and, in force mode, how many leading
    /// bytes of the part are already in the output buffer.
    fn prepare_part(&mut self, header: &YencHeader, part: &YencPart) -> (Status, usize) {
        let number = header.part.unwrap_or_default();
        let total = header
            .total
            .map_or_else(|| "?".to_string(), |t| t.to_string());
        self.notifier.progress(&format!("Part {} of {}", number, total));

        let have = self.session.output.len();
        let force = self.mode == DecodeMode::Force;
        match part.offset().cmp(&have) {
            Ordering::Equal => (Status::SUCCESS, 0),
            Ordering::Greater => {
                let gap = part.offset() - have;
                let msg = format!(
                    "Part {} begins at byte {} but only {} bytes are decoded",
                    number, part.begin, have
                );
                if !force {
                    self.notifier.warning(&msg);
                    return (Status::SIZE_MISMATCH, 0);
                }
                self.notifier
                    .warning(&format!("{}, filling {} bytes with zeros", msg, gap));
                self.session.zero_fill(gap);
                (Status::SUCCESS, 0)
            }
            Ordering::Less => {
                let overlap = have - part.offset();
                let msg = format!(
                    "Part {} begins at byte {} but {} bytes are already decoded",
                    number, part.begin, have
                );
                if !force {
                    self.notifier.warning(&msg);
                    return (Status::SIZE_MISMATCH, 0);
                }
                self.notifier
                    .warning(&format!("{}, skipping {} overlapping bytes", msg, overlap));
                (Status::SUCCESS, overlap)
            }
        }
    }

    /// Compare a trailer against the header and the decoded part
    fn validate_trailer(
        &mut self,
        header: &YencHeader,
        trailer: &YencTrailer,
        decoded_len: usize,
    ) -> Status {
        let mut status = Status::SUCCESS;
        let check_crc = !self.skip_crc;
        let notifier = &mut self.notifier;
        let session = &self.session;

        notifier.debug(&format!("trailer size : {}", trailer.size));

        if let Some(part) = header.part {
            if trailer.part != Some(part) {
                notifier.warning(&format!(
                    "Part mismatch: header says {}, trailer says {:?}",
                    part, trailer.part
                ));
                status |= Status::PART_MISMATCH;
            }

            let part_size = session.declared_part_size;
            if trailer.size != part_size {
                notifier.warning(&format!(
                    "Size mismatch: part range implies {} bytes, trailer says {}",
                    part_size, trailer.size
                ));
                status |= Status::SIZE_MISMATCH;
            }
            if decoded_len != part_size {
                notifier.warning(&format!(
                    "Size mismatch: part range implies {} bytes, decoded {}",
                    part_size, decoded_len
                ));
                status |= Status::SIZE_MISMATCH;
            }

            if let Some(expected) = trailer.pcrc32.filter(|_| check_crc) {
                notifier.debug(&format!("pcrc : {:08x}", expected));
                let actual = session.checksums.part_checksum();
                if actual != expected {
                    notifier.debug(&format!("pcrc_val : {:08x}", actual));
                    notifier.warning("pcrc mismatch!");
                    status |= Status::PART_CRC_MISMATCH;
                }
            }
        } else {
            if trailer.size != header.size {
                notifier.warning(&format!(
                    "Size mismatch: header says {} bytes, trailer says {}",
                    header.size, trailer.size
                ));
                status |= Status::SIZE_MISMATCH;
            }
            if decoded_len != header.size {
                notifier.warning(&format!(
                    "Size mismatch: header says {} bytes, decoded {}",
                    header.size, decoded_len
                ));
                status |= Status::SIZE_MISMATCH;
            }
        }

        if let Some(expected) = trailer.crc32.filter(|_| check_crc) {
            notifier.debug(&format!("crc : {:08x}", expected));
            let actual = session.checksums.whole_checksum();
            if actual != expected {
                notifier.debug(&format!("crc_val : {:08x}", actual));
                notifier.warning("crc mismatch!");
                status |= Status::CRC_MISMATCH;
            }
        }

        status
    }

    /// Close the current part once its bytes are in the output buffer
    fn finish_part(&mut self, header: &YencHeader, decoded_len: usize) {
        if self.mode == DecodeMode::Force && header.is_multipart() {
            let short = self.session.declared_part_size.saturating_sub(decoded_len);
            if short > 0 {
                self.notifier
                    .warning(&format!("Part is {} bytes short, filling with zeros", short));
                self.session.zero_fill(short);
            }
        }
        self.session.checksums.reset_part();
        self.notifier.message(&format!(
            "Decoded {} bytes for {}",
            decoded_len, header.name
        ));
    }
}
