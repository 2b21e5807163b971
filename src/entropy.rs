use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("entropy source unavailable: {0}")]
    Unavailable(String),
}

/// A cryptographically secure byte source used to fill each overwrite pass.
pub trait EntropySource {
    /// Fills all of `dest` or fails; a partial fill is never reported as success.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// OS CSPRNG via `getrandom` (the `getrandom(2)` syscall on Linux).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEntropySource;

impl EntropySource for SystemEntropySource {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(dest).map_err(|why| EntropyError::Unavailable(why.to_string()))
    }
}
