use nix::errno::Errno;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entropy::EntropyError;

/// Category of a failed shred, independent of the carried detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShredErrorKind {
    PathMissing,
    PermissionDenied,
    OpenFailure,
    RandomSourceFailure,
    WriteFailure,
    CloseFailure,
    UnlinkFailure,
}

#[derive(Debug, Error)]
pub enum ShredError {
    #[error("open {}: {source}", .path.display())]
    PathMissing { path: PathBuf, source: io::Error },

    #[error("{op} {}: {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        op: &'static str,
        source: io::Error,
    },

    #[error("open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("random source failed on pass {pass}: {source}")]
    RandomSource { pass: usize, source: EntropyError },

    #[error("write {} (pass {pass}): {source}", .path.display())]
    Write {
        path: PathBuf,
        pass: usize,
        source: io::Error,
    },

    #[error("close {}: {source}", .path.display())]
    Close { path: PathBuf, source: io::Error },

    #[error("remove {}: {source}", .path.display())]
    Unlink { path: PathBuf, source: io::Error },
}

impl ShredError {
    pub fn kind(&self) -> ShredErrorKind {
        match self {
            ShredError::PathMissing { .. } => ShredErrorKind::PathMissing,
            ShredError::PermissionDenied { .. } => ShredErrorKind::PermissionDenied,
            ShredError::Open { .. } => ShredErrorKind::OpenFailure,
            ShredError::RandomSource { .. } => ShredErrorKind::RandomSourceFailure,
            ShredError::Write { .. } => ShredErrorKind::WriteFailure,
            ShredError::Close { .. } => ShredErrorKind::CloseFailure,
            ShredError::Unlink { .. } => ShredErrorKind::UnlinkFailure,
        }
    }

    pub(crate) fn open(path: &Path, errno: Errno) -> ShredError {
        let path = path.to_path_buf();
        let source = io::Error::from(errno);
        match errno {
            Errno::ENOENT => ShredError::PathMissing { path, source },
            Errno::EACCES | Errno::EPERM => ShredError::PermissionDenied {
                path,
                op: "open",
                source,
            },
            _ => ShredError::Open { path, source },
        }
    }

    pub(crate) fn unlink(path: &Path, errno: Errno) -> ShredError {
        let path = path.to_path_buf();
        let source = io::Error::from(errno);
        match errno {
            Errno::EACCES | Errno::EPERM => ShredError::PermissionDenied {
                path,
                op: "remove",
                source,
            },
            _ => ShredError::Unlink { path, source },
        }
    }
}
