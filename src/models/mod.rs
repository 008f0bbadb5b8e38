//! Data models for the library server

pub mod borrow;

pub use borrow::{ActiveBorrow, Borrow, CreateBorrow, NewBorrow};
