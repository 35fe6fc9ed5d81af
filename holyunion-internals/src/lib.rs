#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`holyunion`].
//!
//! # Overview
//!
//! This crate contains the low-level storage, type-level indexing and unsafe
//! lifecycle operations that power the [`holyunion`] tagged union. Everything
//! that needs `unsafe` lives here, behind small types whose invariants can be
//! checked one module at a time.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`holyunion`] crate,
//! not this one.
//!
//! # Architecture
//!
//! - **[`index`]**: Type-level positions ([`Here`], [`There`]) resolved by
//!   trait inference.
//! - **[`members`]**: Member lists. Tuples `(T1, ..., Tn)` implement
//!   [`Members`] and one [`Contains<Ti, Ii>`](Contains) per position, so a
//!   non-member or a duplicated member is rejected at compile time.
//! - **[`storage`]**: [`RawStorage`], a zero-filled block sized and aligned
//!   for the largest member.
//! - **[`variant`]**: The union itself.
//!   - [`RawUnion`]: `#[repr(C)]` discriminant plus storage, owning at most
//!     one member value
//!   - [`RawMemberRef`]: Borrowed, type-erased view of the active member
//!   - [`MemberVtable`], [`CloneVtable`], [`FormatVtable`]: Per-member
//!     function pointers selected by the discriminant
//!
//! # Safety Strategy
//!
//! A union erases the type of its payload and only keeps an index. Every
//! operation that touches the payload must therefore be sure that the index
//! and the bytes agree. This crate maintains that through:
//!
//! - **Module-based encapsulation**: The discriminant of [`RawUnion`] and the
//!   fields of every vtable are module-private, making the invariants locally
//!   verifiable within a single file
//! - **Trait-checked indices**: Typed access goes through [`Contains`], whose
//!   impls are generated once per tuple position
//! - **Discriminant-first teardown**: The discriminant is cleared before a
//!   destructor runs or a value is moved out, so no value is ever dropped
//!   twice
//!
//! [`holyunion`]: https://docs.rs/holyunion/latest/holyunion/

#[cfg(test)]
extern crate alloc;

pub mod index;
pub mod members;
pub mod storage;
mod util;
pub mod variant;

pub use self::{
    index::{Here, Index, There},
    members::{CloneMembers, Contains, DebugMembers, DisplayMembers, Members},
    storage::{End, RawStorage, Slot},
    util::Erased,
    variant::{CloneVtable, EMPTY, FormatVtable, MemberVtable, RawMemberRef, RawUnion},
};
