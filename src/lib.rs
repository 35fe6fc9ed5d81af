#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A closed-set tagged union with inline storage.
//!
//! ## Overview
//!
//! [`Union<L>`] stores exactly one value out of a fixed, ordered list of
//! member types `L`, written as a tuple. The value lives inline in a block of
//! raw storage sized for the largest member; an `i32` discriminant records
//! which member is active, or `-1` when the union is empty.
//!
//! ```
//! use holyunion::Union;
//!
//! let mut union = Union::<(i32, u8, String)>::new();
//!
//! union.set(String::from("hello"));
//! assert!(union.is::<String, _>());
//! assert_eq!(union.get::<String, _>().unwrap(), "hello");
//!
//! // Setting another member drops the string first.
//! union.set(7u8);
//! assert_eq!(union.active(), 1);
//! assert!(union.get::<String, _>().is_err());
//! ```
//!
//! ## Core Concepts
//!
//! - **Member list**: A tuple of 1 to 12 distinct `'static` types. A member's
//!   discriminant is its position in the tuple. Naming a type that is not a
//!   member, or that is listed twice, fails to compile.
//! - **Checked access**: [`Union::get`], [`Union::get_mut`] and
//!   [`Union::remove`] return [`WrongActiveType`] when the union holds a
//!   different member. [`Union::is`] never fails.
//! - **Unchecked access**: [`Union::reinterpret`] reads the leading payload
//!   bytes as any `Copy` type, the way an untagged C union would. It is
//!   `unsafe`.
//! - **Lifecycle**: Exactly the active member is dropped, cloned or moved.
//!   [`Union::take`] and [`Union::move_from`] relocate the value and leave
//!   the source empty.
//! - **Void member**: [`U0`] is a zero-sized member for "holds nothing
//!   meaningful" states that are still distinct from empty.
//!
//! ## Formatting
//!
//! When every member implements [`Display`](core::fmt::Display), so does the
//! union: it prints the active member, or `<empty union>`. The same holds for
//! [`Debug`](core::fmt::Debug). Output always comes from the member's own
//! implementation.
//!
//! ## Legacy Layouts
//!
//! [`Untagged`] is storage without a discriminant, and [`legacy::Value`] is a
//! C-layout tagged record with a fixed set of payload fields.
//!
//! ## Features
//!
//! - `std` (default): Links `std`. Without it the crate is `no_std` and only
//!   needs `alloc`.
//! - `tracing`: Union lifecycle transitions emit `trace`-level events under
//!   the `holyunion` target.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod legacy;

mod error;
mod union;
mod untagged;
mod void;

pub use holyunion_internals::{CloneMembers, Contains, DebugMembers, DisplayMembers, Index, Members};

pub use self::{error::WrongActiveType, union::Union, untagged::Untagged, void::U0};
