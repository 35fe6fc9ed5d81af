//! The tagged union and its type-erased helpers.

mod member_ref;
mod raw;
mod vtable;

pub use self::{
    member_ref::RawMemberRef,
    raw::{EMPTY, RawUnion},
    vtable::{CloneVtable, FormatVtable, MemberVtable},
};
