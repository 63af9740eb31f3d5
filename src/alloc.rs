//! Fallible allocation for key copies, binding slots and bucket arrays.
//!
//! Every allocation the table can recover from goes through here so that a
//! refused request surfaces as `SymTableError::OutOfMemory` instead of an
//! abort. Test builds can force the next allocations to fail.

use crate::error::{Result, SymTableError};
use std::collections::TryReserveError;

fn refused(bytes: usize) -> SymTableError {
    SymTableError::OutOfMemory { bytes }
}

/// Copy `s` into a freshly allocated `String` of exactly its length.
pub(crate) fn try_copy_str(s: &str) -> Result<String> {
    fault::trip(s.len())?;
    let mut out = String::new();
    out.try_reserve_exact(s.len()).map_err(|_| refused(s.len()))?;
    out.push_str(s);
    Ok(out)
}

/// Copy `b` into a freshly allocated `Vec<u8>` of exactly its length.
pub(crate) fn try_copy_bytes(b: &[u8]) -> Result<Vec<u8>> {
    fault::trip(b.len())?;
    let mut out = Vec::new();
    out.try_reserve_exact(b.len()).map_err(|_| refused(b.len()))?;
    out.extend_from_slice(b);
    Ok(out)
}

/// Allocate `len` slots, each initialized to `T::default()`.
pub(crate) fn try_filled_vec<T: Default>(len: usize) -> Result<Vec<T>> {
    let bytes = len.saturating_mul(core::mem::size_of::<T>());
    fault::trip(bytes)?;
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|_| refused(bytes))?;
    out.resize_with(len, T::default);
    Ok(out)
}

/// Run a collection's own `try_reserve`, reporting `bytes` if it is refused.
pub(crate) fn try_reserve_with<F>(bytes: usize, reserve: F) -> Result<()>
where
    F: FnOnce() -> core::result::Result<(), TryReserveError>,
{
    fault::trip(bytes)?;
    reserve().map_err(|_| refused(bytes))
}

#[cfg(not(test))]
mod fault {
    use crate::error::Result;

    #[inline(always)]
    pub(super) fn trip(_bytes: usize) -> Result<()> {
        Ok(())
    }
}
