use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Error that occurs when atomically replacing a file fails.
///
/// Whatever the variant, the file at the destination path is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("path `{0}` has no file name")]
    MissingFileName(PathBuf),
    #[error("failed to create staging file in `{dir}`: {source}")]
    Stage {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write staging file `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to replace `{path}`: {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Replaces the file at `path` with `contents` in a single rename.
///
/// The contents are written to a uniquely named staging file next to `path`,
/// flushed to disk and then renamed over `path`. Readers of `path` observe either
/// the previous file or the new one, never a partially written file. A reader that
/// already holds the previous file open keeps reading it unchanged.
///
/// The staging file is removed if any step fails.
///
/// # Errors
///
/// Returns a [`PublishError`] if staging, writing or the final rename fails.
///
/// # Example
/// ```no_run
/// # use protocol_stats_exporter::fsutil;
/// fsutil::write_atomic("/var/lib/exporter/metrics.prom", b"up 1\n")?;
/// # Ok::<(), fsutil::PublishError>(())
/// ```
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<(), PublishError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| PublishError::MissingFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // same directory, so the rename never crosses a filesystem
    let mut prefix = OsString::from(".");
    prefix.push(file_name);
    prefix.push(".");
    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| PublishError::Stage {
            dir: dir.to_path_buf(),
            source,
        })?;
    let staged_path = staged.path().to_path_buf();
    let write_err = |source| PublishError::Write {
        path: staged_path.clone(),
        source,
    };
    log::trace!("staging `{}`", staged_path.display());
    staged.write_all(contents).map_err(write_err)?;
    staged.flush().map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // staging files are created 0600; scrapers may run as another user
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }
    staged.as_file().sync_all().map_err(write_err)?;

    staged
        .persist(path)
        .map_err(|err| PublishError::Replace {
            path: path.to_path_buf(),
            source: err.error,
        })?;

    Ok(())
}
