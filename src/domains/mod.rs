//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain: the tools it exposes and the
//! executor that runs them.

pub mod tools;
