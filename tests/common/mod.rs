#![allow(dead_code)]

pub mod builders;
pub mod http_stub;
pub mod mocks;
pub mod strategies;

pub use builders::*;
pub use http_stub::*;
pub use mocks::*;
pub use strategies::*;
