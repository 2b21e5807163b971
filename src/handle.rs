use log::warn;
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, fsync, write};
use std::io;
use std::mem;
use std::os::unix::io::RawFd;
use std::path::Path;

/// Write-only descriptor on an existing file, truncated at open.
///
/// The descriptor is closed exactly once: by [`WriteHandle::close`], which
/// reports the close error, or by `Drop` on any early exit.
#[derive(Debug)]
pub struct WriteHandle {
    fd: RawFd,
}

impl WriteHandle {
    /// No `O_CREAT`: a missing path is `ENOENT`.
    pub fn open(path: &Path) -> nix::Result<WriteHandle> {
        let fd = open(
            path,
            OFlag::O_WRONLY | OFlag::O_TRUNC | OFlag::O_CLOEXEC,
            Mode::empty(),
        )?;
        Ok(WriteHandle { fd })
    }

    /// Writes every byte of `buf`, re-issuing the tail after a short write.
    pub fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match write(self.fd, buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short write, {} bytes left", buf.len()),
                    ))
                }
                Ok(n) => buf = &buf[n..],
                Err(Errno::EINTR) => {}
                Err(errno) => return Err(errno.into()),
            }
        }
        Ok(())
    }

    pub fn sync(&self) -> io::Result<()> {
        fsync(self.fd).map_err(io::Error::from)
    }

    pub fn close(self) -> nix::Result<()> {
        let fd = self.fd;
        mem::forget(self);
        close(fd)
    }
}

impl Drop for WriteHandle {
    fn drop(&mut self) {
        if let Err(errno) = close(self.fd) {
            warn!("close fd {} on early exit: {}", self.fd, errno);
        }
    }
}
