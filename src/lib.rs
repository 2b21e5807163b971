//! Overwrite a file with cryptographically random bytes, then unlink it.
//!
//! ```no_run
//! let report = shred::shred("secret.txt")?;
//! assert_eq!(report.bytes_written, 3072);
//! # Ok::<(), shred::ShredError>(())
//! ```
//!
//! Overwriting the logical file does not reach the physical blocks on
//! copy-on-write, journaling or flash-backed filesystems.

pub mod cli;
pub mod entropy;
pub mod error;
pub mod handle;
pub mod shredder;

pub use entropy::{EntropyError, EntropySource, SystemEntropySource};
pub use error::{ShredError, ShredErrorKind};
pub use shredder::{
    shred, shred_with, ShredOptions, ShredReport, Shredder, PASS_COUNT, PASS_SIZE,
};
