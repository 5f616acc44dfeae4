// Zip backup of a file before it gets overwritten (non-destructive).
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::{Error, Result};

/// Write `<name>_<timestamp>.zip` next to `path`, holding the file under its
/// own name, and return its location.
pub fn zip_backup(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("backup");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = parent.join(format!("{}_{}.zip", name, ts));

    let data = fs::read(path)?;
    let mut zip = zip::ZipWriter::new(fs::File::create(&dest)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(name, options)?;
    zip.write_all(&data)?;
    zip.finish()?;
    debug!(source = %path.display(), backup = %dest.display(), "backup written");
    Ok(dest)
}
