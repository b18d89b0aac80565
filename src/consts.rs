//! Wire constants for yEnc 1.2

/// Offset added to every byte by the encoder
pub(crate) const OFFSET: u8 = 42;

/// Extra offset applied to the byte following an escape marker
pub(crate) const ESCAPE_OFFSET: u8 = 64;

/// The escape marker
pub(crate) const ESCAPE_CHAR: u8 = b'=';

/// Prefix of the header line
pub(crate) const YBEGIN: &str = "=ybegin ";

/// Prefix of the multipart sub-header line
pub(crate) const YPART: &str = "=ypart ";

/// Prefix of the trailer line
pub(crate) const YEND: &str = "=yend";
