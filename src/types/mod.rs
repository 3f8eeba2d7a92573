//! Core type system and domain definitions
//!
//! Scope catalog, request records, credentials and the result envelope shared by the
//! validator, the composers and the response normalizer.

pub mod account;
pub mod credential;
pub mod envelope;
pub mod request;
pub mod scope;

pub use account::*;
pub use credential::*;
pub use envelope::*;
pub use request::*;
pub use scope::*;
