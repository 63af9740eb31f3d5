//! symtable: a single-threaded symbol table binding string-like keys to
//! values in chained hash buckets.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: amortized O(1) put/get/remove as the binding count grows, with
//!   every binding always reachable from the one bucket its key hashes to.
//! - Layers (leaves first):
//!   - `hash`: Horner-rule polynomial over the key bytes (multiplier 65599,
//!     wrapping `u64`), reduced modulo the current bucket count.
//!   - `chain`: a `SlotMap` arena of bindings addressed by `BindingId`;
//!     buckets hold the id of their chain head, bindings hold the id of
//!     their successor. Find, prepend, unlink and rebucket live here and
//!     nowhere else touches the links.
//!   - `ladder`: the prime capacity ladder and the `Layout` that decides
//!     whether and where to grow.
//!   - `sym_table`: the public `SymTable<K, V>` built from the above.
//!
//! Constraints
//! - Single-threaded, no interior mutability. `SymTable` is `Send` when its
//!   keys and values are, so a host that needs sharing wraps it in a
//!   `Mutex`.
//! - Keys are unique; a duplicate `put` is rejected and changes nothing.
//! - Keys are copied on insertion and immutable afterwards.
//! - Mutation during traversal is ruled out by the borrow on `for_each`
//!   and the iterators.
//!
//! Growth
//! - Capacities come from `CAPACITY_LADDER` (509 up to 65521). After a
//!   successful `put` leaves `len >= capacity`, a resizable table moves one
//!   rung up. The top rung is final.
//! - Rebucketing allocates the new array first, relinks every binding by
//!   its freshly computed bucket, then swaps the arrays. If the allocation
//!   is refused the table keeps its old array and stays fully usable; the
//!   next `put` tries again.
//! - Removal never shrinks the bucket array.
//!
//! Layouts
//! - `Layout::Resizable` grows along the ladder, `Layout::Fixed` stays at
//!   509 buckets and `Layout::List` keeps a single bucket, i.e. a plain
//!   linked list. They share all code.
//!
//! Failure
//! - `put` reserves its arena slot and copies its key with fallible
//!   allocation before touching any chain, so a refusal surfaces as
//!   `SymTableError::OutOfMemory` with the table unchanged. A refused
//!   bucket array during growth is logged and skipped.
//! - A missing key is `None`/`false`, never an error.

mod alloc;
mod chain;
mod error;
pub mod hash;
mod key;
mod ladder;
mod sym_table;
mod sym_table_proptest;

// Public surface
pub use chain::{IntoIter, Iter, IterMut};
pub use error::{Result, SymTableError};
pub use key::{CopyKey, Key};
pub use ladder::{Layout, CAPACITY_LADDER};
pub use sym_table::SymTable;
