//! Argument sanitation.
//!
//! Every mutating operation, and the generic read/write passthroughs, run
//! their arguments through [`sanitize`] before touching the ledger.

use crate::error::{RegistryError, RegistryResult};

/// Longest accepted argument, in characters.
pub const MAX_ARGUMENT_LEN: usize = 32;

/// Check that every argument is non-empty and at most
/// [`MAX_ARGUMENT_LEN`] characters long.
///
/// # Examples
///
/// ```
/// use roster_registry::validation::sanitize;
///
/// assert!(sanitize(&["d1", "Eng"]).is_ok());
/// assert!(sanitize(&["d1", ""]).is_err());
/// ```
pub fn sanitize<S: AsRef<str>>(args: &[S]) -> RegistryResult<()> {
    for (i, arg) in args.iter().enumerate() {
        let arg = arg.as_ref();
        if arg.is_empty() {
            return Err(RegistryError::InvalidArgument(format!(
                "argument {i} must be a non-empty string"
            )));
        }
        if arg.chars().count() > MAX_ARGUMENT_LEN {
            return Err(RegistryError::InvalidArgument(format!(
                "argument {i} must be <= {MAX_ARGUMENT_LEN} characters"
            )));
        }
    }
    Ok(())
}
