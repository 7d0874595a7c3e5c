/*
Errors raised by the trajectory -> phonon DOS pipeline.

Every variant names the stage that failed. Nothing is retried and nothing is
partially written: the first error aborts the run.
*/

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DosError {
    #[error("trajectory load failed for `{path}`: {reason}")]
    TrajectoryRead { path: PathBuf, reason: String },

    #[error("inconsistent frame {frame}: {reason}")]
    InconsistentFrame { frame: usize, reason: String },

    #[error("velocity autocorrelation: total squared velocity is zero, normalization is undefined")]
    DegenerateVelocity,

    #[error("unsupported frequency unit `{0}` (expected one of THz, cm-1, meV)")]
    UnsupportedUnit(String),

    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("plot rendering failed for `{path}`: {reason}")]
    Plot { path: PathBuf, reason: String },
}

pub type DosResult<T> = Result<T, DosError>;

impl DosError {
    pub fn read(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        DosError::TrajectoryRead {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DosError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps a `csv` failure, keeping the underlying I/O error when there is one.
    pub fn csv(path: impl AsRef<Path>, err: csv::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        let message = err.to_string();
        let source = match err.into_kind() {
            csv::ErrorKind::Io(source) => source,
            _ => std::io::Error::new(std::io::ErrorKind::InvalidData, message),
        };
        DosError::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_stage() {
        let err = DosError::read("run.xyz", "fewer than 2 usable frames");
        let msg = err.to_string();
        assert!(msg.contains("trajectory load"));
        assert!(msg.contains("run.xyz"));

        let err = DosError::InconsistentFrame {
            frame: 3,
            reason: "atom count 8 != 7".to_string(),
        };
        assert!(err.to_string().contains("frame 3"));

        assert!(DosError::DegenerateVelocity
            .to_string()
            .contains("autocorrelation"));
        assert!(DosError::UnsupportedUnit("hz".into())
            .to_string()
            .contains("`hz`"));
    }
}
