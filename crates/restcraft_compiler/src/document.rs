//! OpenAPI document generator

use restcraft_core::openapi::{Info, OpenApi};
use restcraft_core::schema::Components;
use tracing::{info, warn};

use crate::endpoint::{EndpointRoute, assemble_routed, route};
use crate::error::{CompileError, CompileResult};
use crate::index::TypeIndex;
use crate::input::InterfaceDescription;
use crate::options::CompilerOptions;
use crate::schema::ResolutionContext;

/// Compiles interface descriptions against one type index.
pub struct Compiler<'a> {
    index: &'a dyn TypeIndex,
    options: CompilerOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(index: &'a dyn TypeIndex, options: CompilerOptions) -> Self {
        Self { index, options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile one interface into one document.
    ///
    /// Every pass owns a fresh schema registry and subtype cache.
    pub fn compile(&self, interface: &InterfaceDescription) -> CompileResult<OpenApi> {
        let title = interface.simple_name();
        let mut ctx = ResolutionContext::new(self.index, self.options.collision_policy);
        let mut openapi = OpenApi::new(Info {
            title: title.to_string(),
            version: self.options.version.clone(),
            description: Some(format!("{title} API definition")),
        });

        for operation in &interface.operations {
            let route = route(interface, operation)?;
            if !self.route_is_free(&openapi, &route, &operation.name)? {
                continue;
            }
            let endpoint =
                assemble_routed(&mut ctx, route, interface, operation, self.options.strict)?;
            openapi
                .paths
                .entry(endpoint.path.clone())
                .or_default()
                .set_operation(endpoint.method, endpoint.to_operation());
            openapi.add_tag(&endpoint.tag);
        }

        let schemas = ctx.into_registry().into_schemas();
        info!(
            interface = %interface.name,
            operations = interface.operations.len(),
            paths = openapi.paths.len(),
            schemas = schemas.len(),
            "compiled interface"
        );
        if !schemas.is_empty() {
            openapi.components = Some(Components {
                schemas: Some(schemas),
            });
        }
        Ok(openapi)
    }

    /// Whether `route` is still free. A taken route is an error in strict
    /// mode; otherwise the first operation wins and the later one is dropped
    /// before any of its types are resolved.
    fn route_is_free(
        &self,
        openapi: &OpenApi,
        route: &EndpointRoute,
        operation: &str,
    ) -> CompileResult<bool> {
        let taken = openapi
            .paths
            .get(&route.path)
            .is_some_and(|item| item.get_operation(route.method).is_some());
        if !taken {
            return Ok(true);
        }

        let error = CompileError::DuplicateRoute {
            operation: operation.to_string(),
            method: route.method,
            path: route.path.clone(),
        };
        if self.options.strict {
            return Err(error);
        }
        warn!(%error, "keeping the first operation on this route");
        Ok(false)
    }

    /// Compile every interface selected by the `only` option, in order
    pub fn compile_all(
        &self,
        interfaces: &[InterfaceDescription],
    ) -> CompileResult<Vec<OpenApi>> {
        interfaces
            .iter()
            .filter(|interface| match &self.options.only {
                Some(only) => interface.matches(only),
                None => true,
            })
            .map(|interface| self.compile(interface))
            .collect()
    }
}
