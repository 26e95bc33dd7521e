//! `OpenAPI` 3.0.3 document model shared by the restcraft compiler and emitter.

pub mod openapi;
pub mod route;
pub mod schema;

pub use schema::{Schema, SchemaRef, SchemaType};
