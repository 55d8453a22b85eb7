//! # Pactum Core
//!
//! Core contract types for the Pactum endpoint contract layer.
//!
//! This crate provides the foundational pieces the rest of the workspace is
//! built on:
//!
//! - [`ValueType`] - the small type system contracts are written in
//! - [`Field`] / [`Param`] - named, typed contract units
//! - [`Shape`] / [`ShapeArray`] - recursive nested object contracts
//! - [`parse_params`] - legacy dotted-path parameter list normalization
//! - [`ApiRequest`] / [`ApiResponse`] - decoded request/response carriers
//! - [`RequestContext`] / [`RequestId`] - per-request pipeline state
//! - [`Handler`] and its adapters - the two handler conventions
//! - [`ApiError`] - the closed error type with stable wire codes

#![doc(html_root_url = "https://docs.rs/pactum-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod field;
mod handler;
mod params;
mod request;
mod shape;
mod types;

pub use context::{RequestContext, RequestId};
pub use error::{ApiError, ApiResult};
pub use field::{ErrorField, Field, FieldSpecError, Param};
pub use handler::{
    BoxFuture, Completion, CompletionHandler, FnHandler, Handler, HandlerContext, HandlerOutcome,
};
pub use params::{parse_params, ApiParam, ParamSpec};
pub use request::{ApiRequest, ApiResponse};
pub use shape::{Shape, ShapeArray, ShapeEntry};
pub use types::{CastError, ShapeProperty, TypeParseError, ValueType};
