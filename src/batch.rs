//! Decoding a pile of inputs that may belong to several logical files

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::consts::YBEGIN;
use crate::decode::Decoder;
use crate::error::{Result, YencError};
use crate::header::YencHeader;
use crate::status::{DecodeMode, Status};

/// Result of reassembling one logical file
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    pub name: String,
    pub status: Status,
    /// Where the file was written, if it was
    pub written: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Group {
    total: u32,
    parts: BTreeMap<u32, PathBuf>,
}

impl Group {
    fn missing(&self) -> Vec<u32> {
        (1..=self.total)
            .filter(|n| !self.parts.contains_key(n))
            .collect()
    }
}

/// Read up to the first `=ybegin` line of `path` and parse it
pub fn scan_header<P: AsRef<Path>>(path: P) -> Result<YencHeader> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(YencError::InvalidHeader("No header found".to_string()));
        }
        if line.starts_with(YBEGIN.as_bytes()) {
            return YencHeader::parse(&String::from_utf8_lossy(&line));
        }
    }
}

impl Decoder {
    /// Group `inputs` by declared name, decode each group in part order and
    /// write it to `out_dir`.
    ///
    /// In strict mode a group missing any of its `total` parts is rejected
    /// without being decoded. In force mode missing parts are zero-filled.
    /// The session is reinitialized before every group.
    pub fn decode_groups<P: AsRef<Path>>(
        &mut self,
        inputs: &[P],
        out_dir: &Path,
    ) -> Vec<GroupOutcome> {
        let groups = self.group_inputs(inputs);
        let mut outcomes = Vec::with_capacity(groups.len());

        for (name, group) in groups {
            self.reinitialize();
            self.notifier.progress(&format!("Reassembling {}", name));
            outcomes.push(self.decode_group(name, &group, out_dir));
        }

        outcomes
    }

    fn group_inputs<P: AsRef<Path>>(&mut self, inputs: &[P]) -> BTreeMap<String, Group> {
        let mut groups: BTreeMap<String, Group> = BTreeMap::new();

        for input in inputs {
            let input = input.as_ref();
            let header = match scan_header(input) {
                Ok(header) => header,
                Err(err) => {
                    self.notifier.error(&format!("Skipping {}: {}", input.display(), err));
                    continue;
                }
            };

            let part = header.part.unwrap_or(1);
            let group = groups.entry(header.name.clone()).or_default();
            group.total = group.total.max(header.total.unwrap_or(1)).max(part);
            if group.parts.contains_key(&part) {
                self.notifier.warning(&format!(
                    "Duplicate part {} of {} in {}, ignored",
                    part,
                    header.name,
                    input.display()
                ));
                continue;
            }
            group.parts.insert(part, input.to_path_buf());
        }

        groups
    }

    fn decode_group(&mut self, name: String, group: &Group, out_dir: &Path) -> GroupOutcome {
        let force = self.decode_mode() == DecodeMode::Force;
        let missing = group.missing();

        if !missing.is_empty() {
            let msg = format!(
                "{}: {} of {} parts missing ({:?})",
                name,
                missing.len(),
                group.total,
                missing
            );
            if !force {
                self.notifier.error(&msg);
                return GroupOutcome {
                    name,
                    status: Status::FAILED,
                    written: None,
                };
            }
            self.notifier.warning(&msg);
        }

        let mut status = Status::SUCCESS;
        for path in group.parts.values() {
            status |= self.decode_file(path);
            if !force && !status.is_success() {
                break;
            }
        }

        if force {
            self.pad_to_declared_size();
        }

        let mut written = None;
        if force || !status.is_failed() {
            match self.write(out_dir) {
                Ok(path) => written = Some(path),
                Err(_) => status |= Status::FAILED,
            }
        }

        GroupOutcome {
            name,
            status,
            written,
        }
    }
}
