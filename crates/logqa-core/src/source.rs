// Log source - read the whole file in one go, the handle is closed before parsing starts

use crate::CoreError;
use std::fs;
use std::path::Path;

pub fn read_log_file<P: AsRef<Path>>(path: P) -> Result<String, CoreError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| CoreError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
