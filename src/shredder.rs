use log::debug;
use std::path::{Path, PathBuf};

use crate::entropy::{EntropySource, SystemEntropySource};
use crate::error::ShredError;
use crate::handle::WriteHandle;

pub const PASS_COUNT: usize = 3;
pub const PASS_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShredOptions {
    /// `fsync` after every pass so the random bytes reach the device before unlink.
    pub sync_each_pass: bool,
}

impl Default for ShredOptions {
    fn default() -> ShredOptions {
        ShredOptions {
            sync_each_pass: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShredReport {
    pub passes: usize,
    pub bytes_written: u64,
}

/// Overwrites a file with `PASS_COUNT` fresh random buffers, then unlinks it.
pub struct Shredder<E: EntropySource> {
    source: E,
    options: ShredOptions,
}

impl<E: EntropySource> Shredder<E> {
    pub fn new(source: E) -> Shredder<E> {
        Shredder::with_options(source, ShredOptions::default())
    }

    pub fn with_options(source: E, options: ShredOptions) -> Shredder<E> {
        Shredder { source, options }
    }

    pub fn shred<P: AsRef<Path>>(&self, path: P) -> Result<ShredReport, ShredError> {
        let path = path.as_ref();

        let mut handle =
            WriteHandle::open(path).map_err(|errno| ShredError::open(path, errno))?;
        debug!("{}: opened for overwrite", path.display());

        let mut report = ShredReport {
            passes: 0,
            bytes_written: 0,
        };
        for pass in 1..=PASS_COUNT {
            // `handle` is dropped, and so closed, on any `?` below
            self.overwrite_pass(&mut handle, path, pass)?;
            report.passes += 1;
            report.bytes_written += PASS_SIZE as u64;
        }

        handle.close().map_err(|errno| ShredError::Close {
            path: path.to_path_buf(),
            source: errno.into(),
        })?;
        debug!("{}: closed after {} passes", path.display(), report.passes);

        nix::unistd::unlink(path).map_err(|errno| ShredError::unlink(path, errno))?;
        debug!("{}: unlinked", path.display());

        Ok(report)
    }

    fn overwrite_pass(
        &self,
        handle: &mut WriteHandle,
        path: &Path,
        pass: usize,
    ) -> Result<(), ShredError> {
        let mut buffer = [0u8; PASS_SIZE];
        self.source
            .fill_bytes(&mut buffer)
            .map_err(|source| ShredError::RandomSource { pass, source })?;

        let write_err = |source| ShredError::Write {
            path: PathBuf::from(path),
            pass,
            source,
        };
        handle.write_all(&buffer).map_err(write_err)?;
        if self.options.sync_each_pass {
            handle.sync().map_err(write_err)?;
        }
        debug!("{}: pass {} written", path.display(), pass);

        Ok(())
    }
}

/// Shreds `path` with the OS random source and default options.
pub fn shred<P: AsRef<Path>>(path: P) -> Result<ShredReport, ShredError> {
    Shredder::new(SystemEntropySource).shred(path)
}

pub fn shred_with<P: AsRef<Path>>(
    path: P,
    options: ShredOptions,
) -> Result<ShredReport, ShredError> {
    Shredder::with_options(SystemEntropySource, options).shred(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::EntropyError;
    use crate::error::ShredErrorKind;
    use std::cell::RefCell;
    use std::fs::{self, File};
    use std::io::{Read, Write};
    use tempfile::{tempdir, NamedTempFile};

    fn file_with(content: &[u8]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(content).unwrap();
        tmp
    }

    /// Records every buffer it is asked to fill, after filling it from the OS.
    #[derive(Default)]
    struct RecordingSource {
        fills: RefCell<Vec<Vec<u8>>>,
        fail_on: Option<usize>,
    }

    impl RecordingSource {
        fn failing_on(call: usize) -> RecordingSource {
            RecordingSource {
                fills: RefCell::new(Vec::new()),
                fail_on: Some(call),
            }
        }
    }

    impl EntropySource for RecordingSource {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
            let call = self.fills.borrow().len() + 1;
            if self.fail_on == Some(call) {
                return Err(EntropyError::Unavailable("mock exhausted".to_string()));
            }
            SystemEntropySource.fill_bytes(dest)?;
            self.fills.borrow_mut().push(dest.to_vec());
            Ok(())
        }
    }

    #[test]
    fn three_full_passes_then_unlink() {
        let tmp = file_with(&[b'x'; 10 * 1024]);
        let shredder = Shredder::new(RecordingSource::default());

        let report = shredder.shred(tmp.path()).unwrap();

        assert_eq!(
            report,
            ShredReport {
                passes: 3,
                bytes_written: 3072
            }
        );
        let fills = shredder.source.fills.borrow();
        assert_eq!(fills.len(), 3);
        assert!(fills.iter().all(|f| f.len() == PASS_SIZE));
        assert!(!tmp.path().exists());
    }

    #[test]
    fn inode_holds_the_three_buffers_in_order() {
        let tmp = file_with(&[b'x'; 10 * 1024]);
        // keeps the inode readable after unlink
        let mut reader = File::open(tmp.path()).unwrap();
        let shredder = Shredder::new(RecordingSource::default());

        shredder.shred(tmp.path()).unwrap();

        let mut on_disk = Vec::new();
        reader.read_to_end(&mut on_disk).unwrap();
        assert_eq!(on_disk.len(), PASS_COUNT * PASS_SIZE);
        assert_eq!(on_disk, shredder.source.fills.borrow().concat());
        assert!(!tmp.path().exists());
    }

    #[test]
    fn every_pass_gets_fresh_bytes() {
        let tmp = file_with(b"This is a test file.");
        let shredder = Shredder::new(RecordingSource::default());
        shredder.shred(tmp.path()).unwrap();

        let fills = shredder.source.fills.borrow();
        assert_ne!(fills[0], fills[1]);
        assert_ne!(fills[1], fills[2]);
        assert_ne!(fills[0], fills[2]);
    }

    #[test]
    fn random_failure_aborts_and_keeps_file() {
        let tmp = file_with(b"secret");
        let shredder = Shredder::new(RecordingSource::failing_on(2));

        let err = shredder.shred(tmp.path()).unwrap_err();

        assert_eq!(err.kind(), ShredErrorKind::RandomSourceFailure);
        assert!(matches!(err, ShredError::RandomSource { pass: 2, .. }));
        // pass 1 landed, pass 2 never started
        assert_eq!(fs::metadata(tmp.path()).unwrap().len(), PASS_SIZE as u64);
        assert_eq!(shredder.source.fills.borrow().len(), 1);
    }

    #[test]
    fn random_failure_on_first_pass_leaves_truncated_file() {
        let tmp = file_with(b"secret");
        let shredder = Shredder::new(RecordingSource::failing_on(1));

        let err = shredder.shred(tmp.path()).unwrap_err();

        assert_eq!(err.kind(), ShredErrorKind::RandomSourceFailure);
        assert_eq!(fs::metadata(tmp.path()).unwrap().len(), 0);
    }

    #[test]
    fn without_sync_still_shreds() {
        let tmp = file_with(b"data");
        let shredder = Shredder::with_options(
            SystemEntropySource,
            ShredOptions {
                sync_each_pass: false,
            },
        );
        assert_eq!(shredder.shred(tmp.path()).unwrap().passes, 3);
        assert!(!tmp.path().exists());
    }

    #[test]
    fn missing_path_is_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing");
        let err = shred(&path).unwrap_err();
        assert_eq!(err.kind(), ShredErrorKind::PathMissing);
        assert!(!path.exists());
    }
}
