//! # Pactum Docs
//!
//! Machine-readable documentation projection for Pactum endpoint contracts.
//!
//! The projector walks a [`pactum_router::RouteRegistry`] and serializes
//! every non-hidden endpoint (arguments, parameters with nested shapes,
//! response contract, documented errors, deprecation state) into one
//! structural document for external consumption.

#![doc(html_root_url = "https://docs.rs/pactum-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod projector;

pub use projector::{project, Documentation, EndpointDoc, FieldDoc};
