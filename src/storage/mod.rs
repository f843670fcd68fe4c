pub mod codec;
pub mod db;
pub mod models;
mod tables;

pub use codec::CodecError;
pub use db::{ReadPartition, ReadScope, Store, StoreError, StoreStats, WritePartition, WriteScope};
pub use models::Link;
pub use tables::*;
