//! Persisted record shapes and value payload conversion.

pub mod raw;
pub mod value;

pub use raw::*;
pub use value::{LinkResolver, decode_literal, encode_token_data};
