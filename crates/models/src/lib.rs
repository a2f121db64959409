pub mod access;
pub mod clock;
pub mod resource_kind;
pub mod role;
pub mod visibility;
