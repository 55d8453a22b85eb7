//! # Pactum Pipeline
//!
//! The per-request validation-and-dispatch pipeline of the Pactum contract
//! layer.
//!
//! Every request runs the same fixed stage sequence: API-key gate,
//! authorization gate, argument casting, parameter casting, before-hooks,
//! handler invocation (with timeout), response shaping, after-hooks,
//! terminal emission. Each stage short-circuits to error emission
//! through one `ApiResult` channel. See [`Pipeline`].

#![doc(html_root_url = "https://docs.rs/pactum-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod envelope;
mod hooks;
mod pipeline;

pub use config::{
    auth_fn, ApiKeyConfig, ApiKeyLocation, ApiKeyValidator, AuthFn, PipelineConfig,
    ResponseValidation,
};
pub use hooks::{
    AfterHook, BeforeHook, FnAfterHook, FnBeforeHook, HookRegistry, HookSpec, HookSpecError,
};
pub use pipeline::{Pipeline, DOCS_PROP};
