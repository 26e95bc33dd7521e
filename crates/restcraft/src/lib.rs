//! restcraft - REST contracts for legacy RPC interfaces
//!
//! This crate bundles the compiler with the document model and the emitter
//! that writes compiled contracts as YAML or JSON.

// Re-export restcraft_core types so users don't need to depend on restcraft_core directly
pub mod schema {
    pub use restcraft_core::schema::*;
}

pub mod route {
    pub use restcraft_core::route::*;
}

pub mod openapi {
    pub use restcraft_core::openapi::*;
}

pub use restcraft_core::openapi::OpenApi;

pub use restcraft_compiler::{
    CollisionPolicy, CompileError, CompileResult, Compiler, CompilerOptions, ContractSource,
    InterfaceDescription, Member, Operation, OptionsError, Parameter, RouteMetadata,
    TypeCatalog, TypeDefinition, TypeDescriptor, TypeIndex, TypeKind,
};

pub mod emit;
pub mod source;

/// Compile every selected interface of `source`
pub fn compile_source(
    source: &ContractSource,
    options: CompilerOptions,
) -> CompileResult<Vec<OpenApi>> {
    Compiler::new(&source.types, options).compile_all(&source.interfaces)
}
