//! Writing the reassembled file to disk

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::decode::Decoder;
use crate::error::{Result, YencError};

impl Decoder {
    /// Write the decoded data to `path/<name>`.
    ///
    /// `path` is created if it does not exist. The name comes from the first
    /// header of the session. Call this once all parts have been decoded; the
    /// session is left untouched. Every failure is also reported on the
    /// error channel.
    pub fn write<P: AsRef<Path>>(&mut self, path: P) -> Result<PathBuf> {
        let result = self.write_to(path.as_ref());
        if let Err(err) = &result {
            self.notifier.error(&err.to_string());
        }
        result
    }

    fn write_to(&mut self, dir: &Path) -> Result<PathBuf> {
        let name = self
            .session
            .expected_name
            .clone()
            .ok_or(YencError::FilenameNotSet)?;

        if !dir.exists() {
            self.notifier.warning(&format!(
                "Directory {} doesn't exist, creating...",
                dir.display()
            ));
            fs::create_dir_all(dir).map_err(|source| YencError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        } else if !dir.is_dir() {
            return Err(YencError::NotADirectory(dir.to_path_buf()));
        }

        // Never let a header name escape the target directory.
        let file_name = Path::new(&name)
            .file_name()
            .ok_or_else(|| YencError::InvalidHeader(format!("Unusable filename: {}", name)))?;
        if file_name != name.as_str() {
            self.notifier.warning(&format!(
                "Stripped directory components from filename {}",
                name
            ));
        }

        let target = dir.join(file_name);
        self.notifier.debug(&format!("Writing data to {}", target.display()));

        let write_err = |source| YencError::WriteFile {
            path: target.clone(),
            source,
        };
        let mut file = File::create(&target).map_err(write_err)?;
        file.write_all(self.session.data()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        Ok(target)
    }
}
