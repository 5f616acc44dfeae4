//! Editing session: which folder is open, which document is displayed, and
//! where a submitted form gets saved.
//!
//! The session is a plain value. `open_folder` creates it, `display` records
//! the document being edited, and `save` rebuilds form data and writes it,
//! defaulting to the displayed file. Relative paths given to `display` and
//! `save` are taken relative to the open folder.
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::backup::zip_backup;
use crate::error::{Error, Result};
use crate::rebuild::{RebuildOpts, form_to_document};
use crate::store::{self, DocFormat};

#[derive(Clone, Copy, Debug, Default)]
pub struct SaveOpts {
    pub rebuild: RebuildOpts,
    /// Zip the existing target before overwriting it.
    pub backup: bool,
}

#[derive(Debug, Clone)]
pub struct Saved {
    pub path: PathBuf,
    pub format: DocFormat,
    pub backup: Option<PathBuf>,
    pub document: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    folder: Option<PathBuf>,
    file: Option<PathBuf>,
    format: Option<DocFormat>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a folder and list the documents below it.
    pub fn open_folder(dir: &Path) -> Result<(Self, Vec<PathBuf>)> {
        let docs = list_documents(dir)?;
        debug!(folder = %dir.display(), documents = docs.len(), "folder opened");
        let session = Self {
            folder: Some(dir.to_path_buf()),
            ..Self::default()
        };
        Ok((session, docs))
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn format(&self) -> Option<DocFormat> {
        self.format
    }

    /// Resolve `path` against the open folder. Absolute paths, and any path
    /// when no folder is open, come back unchanged.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.folder {
            Some(folder) if path.is_relative() => folder.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Make `path` the current document and load it.
    ///
    /// The selection sticks even when parsing fails, so a later save still
    /// defaults to the chosen file.
    pub fn display(&mut self, path: &Path) -> Result<Value> {
        let format = DocFormat::from_path(path)?;
        let path = self.resolve(path);
        debug!(file = %path.display(), format = format.label(), "displaying document");
        let loaded = store::load_document(&path);
        self.file = Some(path);
        self.format = Some(format);
        loaded
    }

    /// Rebuild `form` into a document and write it to `target`, or to the
    /// displayed file when no target is given. The target's extension picks
    /// YAML or JSON.
    pub fn save<I, K, V>(&self, form: I, target: Option<&Path>, opts: &SaveOpts) -> Result<Saved>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = match target {
            Some(t) => self.resolve(t),
            None => self.file.clone().ok_or(Error::NoFileSelected)?,
        };
        let document = form_to_document(form, &opts.rebuild);
        let format = DocFormat::for_target(&path);
        let backup = if opts.backup && path.is_file() {
            Some(zip_backup(&path)?)
        } else {
            None
        };
        store::write_document(&path, &document, format)?;
        Ok(Saved {
            path,
            format,
            backup,
            document,
        })
    }
}

/// Recursively list openable documents under `dir`, depth-first with siblings
/// sorted by name.
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && store::is_supported(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}
