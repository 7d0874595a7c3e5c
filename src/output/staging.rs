/*
Outputs of one run are written next to their targets under a hidden
`.name.partial.ext` name and only renamed into place by `commit`, once every
one of them has been written. Partial files still around when the set is
dropped are removed, so a run that fails half way leaves no output behind.
 */

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{DosError, DosResult};

/// Sibling of `target` that a staged write goes to. The extension is kept
/// because the plot writer picks its format from it.
pub fn partial_path(target: &Path) -> DosResult<PathBuf> {
    let stem = target.file_stem().ok_or_else(|| {
        DosError::InvalidParameter(format!("`{}` is not a file path", target.display()))
    })?;
    let mut name = OsString::from(".");
    name.push(stem);
    name.push(".partial");
    if let Some(ext) = target.extension() {
        name.push(".");
        name.push(ext);
    }
    Ok(target.with_file_name(name))
}

#[derive(Debug, Default)]
pub struct StagedOutputs {
    // (partial, target)
    staged: Vec<(PathBuf, PathBuf)>,
}

impl StagedOutputs {
    pub fn new() -> Self {
        StagedOutputs::default()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Run `write` against the partial path of `target`. A failed write has
    /// its partial file removed before the error is returned.
    pub fn stage<F>(&mut self, target: impl AsRef<Path>, write: F) -> DosResult<()>
    where
        F: FnOnce(&Path) -> DosResult<()>,
    {
        let target = target.as_ref();
        let partial = partial_path(target)?;
        if let Err(e) = write(&partial) {
            remove_partial(&partial);
            return Err(e);
        }
        if partial.exists() {
            debug!("staged {} as {}", target.display(), partial.display());
            self.staged.push((partial, target.to_path_buf()));
        } else {
            warn!("nothing was written for {}", target.display());
        }
        Ok(())
    }

    /// Move every staged file onto its target. Returns the targets in the
    /// order they were staged.
    pub fn commit(mut self) -> DosResult<Vec<PathBuf>> {
        let staged = std::mem::take(&mut self.staged);
        let mut written = Vec::with_capacity(staged.len());
        let mut pending = staged.into_iter();
        while let Some((partial, target)) = pending.next() {
            if let Err(e) = fs::rename(&partial, &target) {
                remove_partial(&partial);
                self.staged = pending.collect();
                return Err(DosError::io(&target, e));
            }
            written.push(target);
        }
        Ok(written)
    }
}

impl Drop for StagedOutputs {
    fn drop(&mut self) {
        for (partial, _) in self.staged.drain(..) {
            remove_partial(&partial);
        }
    }
}

fn remove_partial(partial: &Path) {
    match fs::remove_file(partial) {
        Ok(()) => debug!("removed {}", partial.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove {}: {e}", partial.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("heo_md_staging_{label}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_str(contents: &'static str) -> impl FnOnce(&Path) -> DosResult<()> {
        move |p: &Path| fs::write(p, contents).map_err(|e| DosError::io(p, e))
    }

    #[test]
    fn partial_names_keep_the_extension() {
        assert_eq!(
            partial_path(Path::new("out/phonon_dos.svg")).unwrap(),
            PathBuf::from("out/.phonon_dos.partial.svg")
        );
        assert_eq!(
            partial_path(Path::new("table")).unwrap(),
            PathBuf::from(".table.partial")
        );
        assert!(partial_path(Path::new("/")).is_err());
    }

    #[test]
    fn nothing_reaches_the_target_before_commit() {
        let dir = scratch("commit");
        let target = dir.join("a.csv");
        let _ = fs::remove_file(&target);

        let mut outputs = StagedOutputs::new();
        outputs.stage(&target, write_str("x\n")).unwrap();
        assert!(!target.exists());
        assert!(dir.join(".a.partial.csv").exists());

        assert_eq!(outputs.commit().unwrap(), vec![target.clone()]);
        assert_eq!(fs::read_to_string(&target).unwrap(), "x\n");
        assert!(!dir.join(".a.partial.csv").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn dropping_without_commit_discards_staged_files() {
        let dir = scratch("drop");
        let first = dir.join("first.csv");
        let second = dir.join("second.csv");
        {
            let mut outputs = StagedOutputs::new();
            outputs.stage(&first, write_str("1\n")).unwrap();
            let err = outputs
                .stage(&second, |p| {
                    fs::write(p, "half").map_err(|e| DosError::io(p, e))?;
                    Err(DosError::InvalidParameter("late failure".into()))
                })
                .expect_err("second write fails");
            assert!(matches!(err, DosError::InvalidParameter(_)));
            assert_eq!(outputs.len(), 1);
        }
        for name in ["first.csv", ".first.partial.csv", "second.csv", ".second.partial.csv"] {
            assert!(!dir.join(name).exists(), "{name} left behind");
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_fails_at_stage_time() {
        let dir = scratch("missing");
        let mut outputs = StagedOutputs::new();
        let err = outputs
            .stage(dir.join("no_such_dir").join("p.csv"), write_str("1\n"))
            .expect_err("parent does not exist");
        assert!(matches!(err, DosError::Io { .. }));
        assert!(outputs.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }
}
