//! yEnc 1.2 decoder.
//!
//! A [`Decoder`] keeps a [`MultipartSession`] across calls, so a multipart
//! post is reassembled by decoding its parts in order and writing once:
//!
//! ```no_run
//! use ydecode::{Channel, Decoder};
//!
//! let mut decoder = Decoder::new();
//! decoder.subscribe(Channel::Warning, |msg| eprintln!("{msg}"));
//!
//! for part in ["file.part1.yenc", "file.part2.yenc"] {
//!     let status = decoder.decode_file(part);
//!     if !status.is_success() {
//!         eprintln!("{part}: {status}");
//!     }
//! }
//! decoder.write(".").unwrap();
//! ```

mod batch;
mod checksum;
mod consts;
mod decode;
mod error;
pub mod header;
mod notify;
mod output;
mod session;
mod status;

pub use batch::{GroupOutcome, scan_header};
pub use checksum::ChecksumTracker;
pub use decode::{Decoder, decode_line};
pub use error::{Result, YencError};
pub use header::{YencHeader, YencPart, YencTrailer};
pub use notify::{Channel, Notifier, SubscriptionId};
pub use session::MultipartSession;
pub use status::{DecodeMode, Status};
