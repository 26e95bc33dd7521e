//! Endpoint assembly: one legacy operation to one REST operation.

use std::collections::BTreeMap;

use restcraft_core::route::{HttpMethod, Operation as RestOperation, Parameter, RequestBody, Response};
use restcraft_core::{Schema, SchemaRef};
use tracing::{debug, warn};

use crate::descriptor::TypeDescriptor;
use crate::error::{CompileError, CompileResult};
use crate::input::{InterfaceDescription, Operation};
use crate::naming::{kebab_case, pascal_case};
use crate::registry::{Claim, SchemaOrigin};
use crate::schema::{Classification, ContainerFamily, ResolutionContext, classify, strip_optional};

/// Container kind of an operation's return type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `void`: no content
    None,
    Single,
    Sequence,
    Set,
    Map,
}

/// A parameter sent in the request body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyParameter {
    pub name: String,
    pub schema: SchemaRef,
    pub origin: TypeDescriptor,
}

/// Fully decided shape of one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
    pub tag: String,
    pub description: String,
    /// Query parameters in declaration order; empty whenever `body` is not
    pub query: Vec<(String, SchemaRef)>,
    /// Body parameters in declaration order
    pub body: Vec<BodyParameter>,
    /// Request body schema: the single body parameter, or the synthesized wrapper
    pub request_body: Option<SchemaRef>,
    /// `None` for "no content"
    pub response: Option<SchemaRef>,
    pub response_shape: ResponseShape,
}

impl EndpointSpec {
    /// Build the `OpenAPI` operation for this endpoint
    pub fn to_operation(&self) -> RestOperation {
        let parameters = (!self.query.is_empty()).then(|| {
            self.query
                .iter()
                .map(|(name, schema)| Parameter::query(name.as_str(), schema.clone()))
                .collect()
        });

        let mut responses = BTreeMap::new();
        match &self.response {
            Some(schema) => responses.insert("200".to_string(), Response::ok(schema.clone())),
            None => responses.insert("default".to_string(), Response::no_content()),
        };

        RestOperation {
            operation_id: Some(self.operation_id.clone()),
            tags: Some(vec![self.tag.clone()]),
            summary: Some(self.operation_id.clone()),
            description: Some(self.description.clone()),
            parameters,
            request_body: self.request_body.clone().map(RequestBody::json),
            responses,
        }
    }
}

/// Where and under which identity an operation is served. Decided from the
/// names and routing metadata alone, before any type is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRoute {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
    pub tag: String,
    pub description: String,
}

/// Apply the routing defaults of `operation`, overridden field by field by
/// its routing metadata.
pub fn route(interface: &InterfaceDescription, operation: &Operation) -> CompileResult<EndpointRoute> {
    let operation_id = kebab_case(&operation.name);
    let metadata = operation.route.clone().unwrap_or_else(|| {
        debug!(
            operation = %operation.name,
            "no routing metadata, using defaults"
        );
        Default::default()
    });

    let method = match metadata.method.as_deref() {
        Some(method) => {
            HttpMethod::try_from(method).map_err(|_| CompileError::UnsupportedMethod {
                operation: operation.name.clone(),
                method: method.to_string(),
            })?
        }
        None => HttpMethod::Post,
    };
    let path = metadata
        .path
        .unwrap_or_else(|| format!("/{}/{}", interface.simple_name(), operation.name));
    let tag = metadata
        .tag
        .unwrap_or_else(|| interface.simple_name().to_string());
    let description = metadata.description.unwrap_or_else(|| operation_id.clone());

    Ok(EndpointRoute {
        path,
        method,
        operation_id,
        tag,
        description,
    })
}

enum Placement {
    Query,
    Body,
}

/// Assemble the endpoint of `operation`, resolving every type it mentions
/// into `ctx`.
///
/// In strict mode a map-typed parameter fails the operation; otherwise it is
/// skipped with a warning.
pub fn assemble(
    ctx: &mut ResolutionContext<'_>,
    interface: &InterfaceDescription,
    operation: &Operation,
    strict: bool,
) -> CompileResult<EndpointSpec> {
    let route = route(interface, operation)?;
    assemble_routed(ctx, route, interface, operation, strict)
}

/// [`assemble`] with the route already decided
pub fn assemble_routed(
    ctx: &mut ResolutionContext<'_>,
    route: EndpointRoute,
    interface: &InterfaceDescription,
    operation: &Operation,
    strict: bool,
) -> CompileResult<EndpointSpec> {
    let EndpointRoute {
        path,
        method,
        operation_id,
        tag,
        description,
    } = route;

    let (response, response_shape) = resolve_response(ctx, operation)?;

    let mut placed = Vec::with_capacity(operation.parameters.len());
    for parameter in &operation.parameters {
        let ty = &parameter.type_descriptor;
        let family = ContainerFamily::of(strip_optional(ty));
        if family == Some(ContainerFamily::Map) {
            let error = CompileError::UnsupportedMapParameter {
                operation: operation.name.clone(),
                parameter: parameter.name.clone(),
                type_name: ty.to_string(),
            };
            if strict {
                return Err(error);
            }
            warn!(%error, "skipping parameter");
            continue;
        }

        let schema = ctx.resolve_root(ty)?;
        let placement = if schema.is_ref() || family.is_some_and(ContainerFamily::is_collection) {
            Placement::Body
        } else {
            Placement::Query
        };
        placed.push((placement, parameter, schema));
    }

    let has_body = placed.iter().any(|(p, ..)| matches!(p, Placement::Body));
    let (query, body): (Vec<_>, Vec<_>) = if has_body {
        // body and query parameters never mix
        let body = placed
            .into_iter()
            .map(|(_, parameter, schema)| BodyParameter {
                name: parameter.name.clone(),
                schema,
                origin: parameter.type_descriptor.clone(),
            })
            .collect();
        (Vec::new(), body)
    } else {
        let query = placed
            .into_iter()
            .map(|(_, parameter, schema)| (parameter.name.clone(), schema))
            .collect();
        (query, Vec::new())
    };

    let request_body = match body.as_slice() {
        [] => None,
        [single] => Some(single.schema.clone()),
        _ => Some(request_wrapper(ctx, interface, operation, &body)?),
    };

    Ok(EndpointSpec {
        path,
        method,
        operation_id,
        tag,
        description,
        query,
        body,
        request_body,
        response,
        response_shape,
    })
}

fn resolve_response(
    ctx: &mut ResolutionContext<'_>,
    operation: &Operation,
) -> CompileResult<(Option<SchemaRef>, ResponseShape)> {
    let returns = &operation.returns;
    if classify(returns) == Classification::Void {
        return Ok((None, ResponseShape::None));
    }

    let shape = match ContainerFamily::of(strip_optional(returns)) {
        Some(ContainerFamily::Sequence) => ResponseShape::Sequence,
        Some(ContainerFamily::Set) => ResponseShape::Set,
        Some(ContainerFamily::Map) => {
            warn!(
                operation = %operation.name,
                type_name = %returns,
                "map return types are resolved best-effort"
            );
            ResponseShape::Map
        }
        None => ResponseShape::Single,
    };
    Ok((Some(ctx.resolve_root(returns)?), shape))
}

/// Register `<OperationName>Request` bundling every body parameter
fn request_wrapper(
    ctx: &mut ResolutionContext<'_>,
    interface: &InterfaceDescription,
    operation: &Operation,
    body: &[BodyParameter],
) -> CompileResult<SchemaRef> {
    let origins: Vec<String> = body.iter().map(|p| p.origin.to_string()).collect();
    let signature = format!(
        "request {}.{}({})",
        interface.name,
        operation.name,
        body.iter()
            .map(|p| p.origin.qualified())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let preferred = format!("{}Request", pascal_case(&operation.name));

    let name = match ctx
        .registry_mut()
        .claim(&preferred, SchemaOrigin::Synthetic(signature))?
    {
        Claim::Existing(name) => return Ok(SchemaRef::component(&name)),
        Claim::New(name) => name,
    };

    let mut wrapper =
        Schema::object().with_description(format!("Wrapper for [{}]", origins.join(", ")));
    for parameter in body {
        wrapper.insert_property(parameter.name.as_str(), parameter.schema.clone());
    }
    ctx.registry_mut().define(&name, wrapper);
    Ok(SchemaRef::component(&name))
}
