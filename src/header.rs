//! yEnc header and trailer parsing

use std::str::FromStr;

use crate::consts::{YBEGIN, YEND, YPART};
use crate::error::{Result, YencError};

/// Look up the value of `key` in a yEnc control line.
///
/// The key only matches at a field boundary, so `crc32` never picks up the
/// tail of `pcrc32`. The value runs up to the next whitespace. Scanning stops
/// at `name=`, which always takes the rest of the line.
pub fn attribute<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    for token in line.split_whitespace() {
        let Some((k, v)) = token.split_once('=') else {
            continue;
        };
        if k == key {
            return Some(v);
        }
        if k == "name" {
            break;
        }
    }
    None
}

/// Value of the `name` attribute: everything after `name=` to the end of the
/// line, trimmed. Names may contain spaces.
pub fn name_attribute(line: &str) -> Option<&str> {
    let pos = line.match_indices("name=").find_map(|(pos, _)| {
        let boundary = line[..pos]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        boundary.then_some(pos)
    })?;
    let value = line[pos + "name=".len()..].trim();
    (!value.is_empty()).then_some(value)
}

fn number<T: FromStr>(line: &str, key: &'static str) -> Result<Option<T>> {
    attribute(line, key)
        .map(|v| {
            v.parse().map_err(|_| YencError::InvalidNumber {
                field: key,
                value: v.to_string(),
            })
        })
        .transpose()
}

fn hex(line: &str, key: &'static str) -> Result<Option<u32>> {
    attribute(line, key)
        .map(|v| {
            u32::from_str_radix(v, 16).map_err(|_| YencError::InvalidNumber {
                field: key,
                value: v.to_string(),
            })
        })
        .transpose()
}

/// yEnc header
#[derive(Debug, Clone, PartialEq)]
pub struct YencHeader {
    pub name: String,
    /// Size of the whole file, even on a multipart header
    pub size: usize,
    pub line_len: usize,
    pub part: Option<u32>,
    pub total: Option<u32>,
}

impl YencHeader {
    /// Parse a yEnc header line (e.g., "=ybegin line=128 size=123456 name=file.bin")
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end();
        if !line.starts_with(YBEGIN) {
            return Err(YencError::InvalidHeader(
                "Header must start with '=ybegin'".to_string(),
            ));
        }

        Ok(YencHeader {
            line_len: number(line, "line")?.ok_or(YencError::MissingField("line"))?,
            size: number(line, "size")?.ok_or(YencError::MissingField("size"))?,
            name: name_attribute(line)
                .ok_or(YencError::MissingField("name"))?
                .to_string(),
            part: number(line, "part")?,
            total: number(line, "total")?,
        })
    }

    pub fn is_multipart(&self) -> bool {
        self.part.is_some()
    }
}

/// yEnc part information (for multi-part files)
#[derive(Debug, Clone, PartialEq)]
pub struct YencPart {
    pub begin: usize,
    pub end: usize,
}

impl YencPart {
    /// Parse a yEnc part line (e.g., "=ypart begin=1 end=100000")
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end();
        if !line.starts_with(YPART) {
            return Err(YencError::InvalidHeader(
                "Part line must start with '=ypart'".to_string(),
            ));
        }

        let begin: usize = number(line, "begin")?.ok_or(YencError::MissingField("begin"))?;
        let end: usize = number(line, "end")?.ok_or(YencError::MissingField("end"))?;
        if begin == 0 || end < begin {
            return Err(YencError::InvalidPartRange { begin, end });
        }

        Ok(YencPart { begin, end })
    }

    /// Calculate the expected part size (end - begin + 1)
    ///
    /// Note: begin and end are 1-based inclusive positions
    pub fn size(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Zero-based offset of the first byte of this part
    pub fn offset(&self) -> usize {
        self.begin - 1
    }
}

/// yEnc trailer
#[derive(Debug, Clone, PartialEq)]
pub struct YencTrailer {
    /// Part size on a multipart trailer, whole-file size otherwise
    pub size: usize,
    pub part: Option<u32>,
    pub pcrc32: Option<u32>,
    pub crc32: Option<u32>,
}

impl YencTrailer {
    /// Parse a yEnc trailer line (e.g., "=yend size=123456 crc32=abcd1234")
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end();
        if !line.starts_with(YEND) {
            return Err(YencError::InvalidHeader(
                "Trailer must start with '=yend'".to_string(),
            ));
        }

        Ok(YencTrailer {
            size: number(line, "size")?.ok_or(YencError::MissingField("size"))?,
            part: number(line, "part")?,
            pcrc32: hex(line, "pcrc32")?,
            crc32: hex(line, "crc32")?,
        })
    }
}
