//! # Pactum
//!
//! **Declarative contract layer for HTTP endpoints**
//!
//! Pactum lets a service define, per route and per version, the expected
//! arguments, query/body parameters, response shape, authorization
//! requirement and error vocabulary, then enforces that contract on every
//! request and derives machine-readable documentation from it:
//!
//! - **Typed contracts** – fields, parameters and recursive shapes with
//!   construction-time type resolution
//! - **Versioned routing** – `/{version}{route}` resolution with automatic
//!   deprecation of superseded versions
//! - **A strict pipeline** – API-key gate, authorization gate, argument and
//!   parameter casting, ordered hooks, timeout-guarded handlers, response
//!   shaping and a stable error vocabulary
//! - **Derived documentation** – every contract projected into one
//!   machine-readable document
//!
//! The HTTP transport itself stays outside: the embedding server decodes
//! the wire request into an [`ApiRequest`], calls [`Api::dispatch`] and
//! serializes the returned [`ApiResponse`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pactum::prelude::*;
//!
//! let mut api = Api::builder().name("user-service").build();
//!
//! api.get("/users/:id", Endpoint::builder()
//!     .version(1)
//!     .arg(Field::new("id", ValueType::Integer))
//!     .response(vec![Field::new("id", ValueType::Integer)])
//!     .handler(FnHandler::new(|ctx| async move {
//!         Ok(serde_json::json!({"id": ctx.arg("id")}))
//!     }))
//!     .build()?);
//!
//! api.enable_docs("/docs");
//! ```

#![doc(html_root_url = "https://docs.rs/pactum/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use pactum_core as core;

// Re-export router types
pub use pactum_router as router;

// Re-export pipeline types
pub use pactum_pipeline as pipeline;

// Re-export docs types
pub use pactum_docs as docs;

mod api;

pub use api::{Api, ApiBuilder};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use pactum::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Api, ApiBuilder};

    pub use pactum_core::{
        ApiError, ApiParam, ApiRequest, ApiResponse, ApiResult, Completion, CompletionHandler,
        ErrorField, Field, FnHandler, Handler, HandlerContext, Param, ParamSpec, RequestContext,
        RequestId, Shape, ShapeArray, ShapeEntry, ValueType,
    };

    pub use pactum_router::{AuthMode, Endpoint, EndpointBuilder, ResponseContract};

    pub use pactum_pipeline::{
        auth_fn, AfterHook, ApiKeyConfig, ApiKeyLocation, BeforeHook, FnAfterHook, FnBeforeHook,
        ResponseValidation,
    };
}
