#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod error;
mod memory;
mod store;


pub use self::{
    error::StoreError,
    memory::MemoryStore,
    store::{Page, ResourceStore, SharedStore},
};
