//! Terminal chat client for the mortgage advisor
//!
//! Talks to a running API over HTTP through [`RemoteClient`], or to an
//! in-process module through the same `MortgageAdvisorApi` trait.

pub mod format;
pub mod remote;

pub use remote::RemoteClient;
