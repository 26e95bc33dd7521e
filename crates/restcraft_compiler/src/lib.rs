//! Compiler from legacy RPC interface descriptions to `OpenAPI` 3.0.3 contracts.
//!
//! The pipeline runs leaf-first: scalar classification, container and object
//! resolution, hierarchy composition, endpoint assembly and finally document
//! assembly in [`Compiler`].
//!
//! ```ignore
//! let source: ContractSource = serde_yaml::from_str(&text)?;
//! let compiler = Compiler::new(&source.types, CompilerOptions::default());
//! let documents = compiler.compile_all(&source.interfaces)?;
//! ```

pub mod descriptor;
pub mod document;
pub mod endpoint;
pub mod error;
pub mod index;
pub mod input;
pub mod naming;
pub mod options;
pub mod registry;
pub mod schema;

pub use descriptor::{DescriptorError, TypeDescriptor};
pub use document::Compiler;
pub use endpoint::{BodyParameter, EndpointSpec, ResponseShape};
pub use error::{CompileError, CompileResult, OptionsError};
pub use index::{Member, TypeCatalog, TypeDefinition, TypeIndex, TypeKind};
pub use input::{ContractSource, InterfaceDescription, Operation, Parameter, RouteMetadata};
pub use options::{CollisionPolicy, CompilerOptions};
pub use registry::{SchemaOrigin, SchemaRegistry};
pub use schema::{HierarchyInfo, MAX_RESOLUTION_DEPTH, ResolutionContext};
