//! # Pactum Router
//!
//! Versioned endpoint registry for the Pactum contract layer.
//!
//! This crate provides:
//!
//! - [`Endpoint`] / [`EndpointBuilder`] - one versioned handler with its
//!   full contract
//! - [`Route`] - all versions of one method+path, with the deprecation rule
//! - [`RouteRegistry`] - the application-owned route table with version
//!   resolution
//! - [`RawArgs`] - raw path-argument extraction

#![doc(html_root_url = "https://docs.rs/pactum-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod args;
mod endpoint;
mod registry;
mod route;

pub use args::RawArgs;
pub use endpoint::{AuthMode, Endpoint, EndpointBuilder, EndpointError, ResponseContract};
pub use registry::{RouteMatch, RouteRegistry};
pub use route::Route;
