use crate::infrastructure::error::InfrastructureError;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const MAX_SUFFIX: u32 = 10_000;

/// Writes `content` atomically to the first free path among `{stem}.{ext}`,
/// `{stem}_1.{ext}`, `{stem}_2.{ext}`, ...
///
/// The content goes to a temporary file in `dir` first. It is then linked in
/// with `persist_noclobber`, so an existing file is never replaced, including
/// one created by another process after the name was picked.
pub fn write_unique<C: AsRef<[u8]>>(
    dir: &Path,
    stem: &str,
    ext: &str,
    content: C,
) -> Result<PathBuf, InfrastructureError> {
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    for n in 0..MAX_SUFFIX {
        let candidate = if n == 0 {
            dir.join(format!("{}.{}", stem, ext))
        } else {
            dir.join(format!("{}_{}.{}", stem, n, ext))
        };
        match temp_file.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp_file = e.file,
            Err(e) => return Err(InfrastructureError::Io(e.error)),
        }
    }

    Err(InfrastructureError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free file name for '{}' in {:?}", stem, dir),
    )))
}
