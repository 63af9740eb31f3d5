//! Key traits: what the table needs from a key type.
//!
//! Keys are compared by value and hashed over a byte view. The table keeps
//! its own copy of every key, taken through `CopyKey::try_copy` so a failed
//! copy can be reported instead of aborting.

use crate::alloc;
use crate::error::Result;
use core::borrow::Borrow;

/// A key that can be hashed over its bytes and compared by value.
///
/// A borrowed form and its owned form (e.g. `str` and `String`) must expose
/// the same bytes and agree on equality, the same contract `Borrow` places
/// on `Hash` and `Eq`.
pub trait Key: Eq {
    fn key_bytes(&self) -> &[u8];
}

/// A key form the table can copy into storage it owns.
pub trait CopyKey: Key {
    type Owned: Key + Borrow<Self>;

    /// Allocate a private copy, or report `OutOfMemory`.
    fn try_copy(&self) -> Result<Self::Owned>;
}

impl Key for str {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Key for String {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Key for [u8] {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl Key for Vec<u8> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl CopyKey for str {
    type Owned = String;

    fn try_copy(&self) -> Result<String> {
        alloc::try_copy_str(self)
    }
}

impl CopyKey for String {
    type Owned = String;

    fn try_copy(&self) -> Result<String> {
        alloc::try_copy_str(self)
    }
}

impl CopyKey for [u8] {
    type Owned = Vec<u8>;

    fn try_copy(&self) -> Result<Vec<u8>> {
        alloc::try_copy_bytes(self)
    }
}

impl CopyKey for Vec<u8> {
    type Owned = Vec<u8>;

    fn try_copy(&self) -> Result<Vec<u8>> {
        alloc::try_copy_bytes(self)
    }
}
