//! Convention field binder.
//!
//! Containers declare members as a closed set of recognized shapes; binding
//! scans the declared members, produces the matching schema field for each,
//! wires the member's function value as resolver and copies the declared
//! auth metadata onto the produced field. A member whose function value does
//! not belong to its declared binding kind is a build-time failure.

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use relaykit_core::{
    AddPayload, Connection, DeletePayload, FieldMetadata, GlobalId, IdHandling, LocalId,
    ModelInstance, ModelType, ModelValue, Parameters, ScalarKind, SchemaTypeRef, TypeKind,
    TypeRegistry, UpdatePayload, classify, clone_as, to_first_lower,
};

use crate::config::SchemaConfig;
use crate::context::ResolveContext;
use crate::error::SchemaError;
use crate::fields::{Argument, FieldDefinition, ObjectTypeDef, ResolverResult};
use crate::types::{
    add_input_type, add_payload_type, connection_arguments, connection_type, delete_input_type,
    delete_payload_type, node_object_type, object_type, order_by_type, simple_update_input_type,
    update_input_type, update_payload_type,
};

/// Plain field resolver: returns an entity value.
pub type PlainFieldFn = Arc<dyn Fn(&ResolveContext) -> ResolverResult<ModelValue> + Send + Sync>;

/// Id-lookup field resolver: returns the entity with the given native id.
pub type FieldByIdFn =
    Arc<dyn Fn(&ResolveContext, LocalId) -> ResolverResult<Option<ModelInstance>> + Send + Sync>;

/// List field resolver: returns an ordered sequence of entities.
pub type ListFn = Arc<dyn Fn(&ResolveContext) -> ResolverResult<Vec<ModelInstance>> + Send + Sync>;

/// Connection field resolver: receives the resolved paging/sorting
/// parameters and returns a built connection.
pub type ConnectionFn = Arc<
    dyn Fn(&ResolveContext, Parameters) -> ResolverResult<Connection<ModelInstance>> + Send + Sync,
>;

/// Mutation resolver for add and update flavors: receives the decoded
/// domain input and returns the changed entity.
pub type MutationFn =
    Arc<dyn Fn(&ResolveContext, ModelInstance) -> ResolverResult<ModelInstance> + Send + Sync>;

/// Delete mutation resolver: receives the decoded target id and the raw
/// input, returns whether the delete happened.
pub type DeleteFn = Arc<
    dyn Fn(&ResolveContext, LocalId, &ModelInstance) -> ResolverResult<bool> + Send + Sync,
>;

/// The closed set of member shapes the binder recognizes.
#[derive(Clone)]
pub enum FieldShape {
    Field(PlainFieldFn),
    FieldById(FieldByIdFn),
    List(ListFn),
    Connection(ConnectionFn),
    Add(MutationFn),
    Update(MutationFn),
    SimpleUpdate(MutationFn),
    Delete(DeleteFn),
}

impl FieldShape {
    fn name(&self) -> &'static str {
        match self {
            Self::Field(_) => "Field",
            Self::FieldById(_) => "FieldById",
            Self::List(_) => "List",
            Self::Connection(_) => "Connection",
            Self::Add(_) => "Add",
            Self::Update(_) => "Update",
            Self::SimpleUpdate(_) => "SimpleUpdate",
            Self::Delete(_) => "Delete",
        }
    }
}

/// The declared binding kind of a member, the annotation side of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Field,
    List,
    Connection,
    Mutation,
}

impl BindingKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Field => "Field",
            Self::List => "List",
            Self::Connection => "Connection",
            Self::Mutation => "Mutation",
        }
    }
}

/// A declared container member: the annotation metadata plus the function
/// value to bind.
pub struct MemberBinding {
    /// The declared member name, e.g. `EntityConnection`.
    pub name: String,
    pub kind: BindingKind,
    /// The entity the member works on.
    pub entity: Arc<ModelType>,
    pub shape: FieldShape,
    /// Explicit authentication requirement; the configured default applies
    /// when absent.
    pub auth_required: Option<bool>,
    pub required_roles: BTreeSet<String>,
    /// Extra arguments declared on the member, also fed into order-by
    /// additions synthesis for connections.
    pub extra_arguments: Vec<Argument>,
    /// Explicit field name; derived from the member name when absent.
    pub field_name: Option<String>,
}

impl MemberBinding {
    /// Declares a member.
    pub fn new(
        name: impl Into<String>,
        kind: BindingKind,
        entity: Arc<ModelType>,
        shape: FieldShape,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            entity,
            shape,
            auth_required: None,
            required_roles: BTreeSet::new(),
            extra_arguments: Vec::new(),
            field_name: None,
        }
    }

    /// Declares the authentication requirement.
    #[must_use]
    pub fn require_authentication(mut self, required: bool) -> Self {
        self.auth_required = Some(required);
        self
    }

    /// Declares required roles.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Declares an extra argument.
    #[must_use]
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.extra_arguments.push(argument);
        self
    }

    /// Overrides the derived field name.
    #[must_use]
    pub fn named(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    fn field_name(&self) -> String {
        self.field_name
            .clone()
            .unwrap_or_else(|| to_first_lower(&self.name))
    }

    fn metadata(&self, config: &SchemaConfig) -> FieldMetadata {
        let mut metadata = FieldMetadata::with_authentication(
            self.auth_required.unwrap_or(config.default_auth_required),
        );
        metadata.required_roles = self.required_roles.clone();
        metadata
    }
}

/// Binds viewer containers: plain fields, id lookups, lists and
/// connections.
pub struct ViewerBinder {
    type_name: String,
    bindings: Vec<MemberBinding>,
}

impl ViewerBinder {
    /// Creates a binder for the named viewer type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            bindings: Vec::new(),
        }
    }

    /// Declares a member.
    #[must_use]
    pub fn with_member(mut self, binding: MemberBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Converts all declared members to fields.
    ///
    /// # Errors
    ///
    /// Fails on duplicate member names, members whose function value does
    /// not belong to their declared kind, and entities without a usable id
    /// member where one is needed.
    pub fn bind(self, registry: &TypeRegistry, config: &SchemaConfig) -> Result<ObjectTypeDef, SchemaError> {
        debug!(type_name = %self.type_name, members = self.bindings.len(), "binding viewer container");

        // the viewer is itself a node
        let mut def = ObjectTypeDef::new(&self.type_name).with_field(
            FieldDefinition::new("id", SchemaTypeRef::scalar(ScalarKind::Id))
                .with_description("The global unique id of an object"),
        );

        let mut seen = HashSet::new();
        for binding in self.bindings {
            let field_name = binding.field_name();
            if !seen.insert(field_name.clone()) {
                return Err(SchemaError::DuplicateMember(field_name));
            }

            let field = match (&binding.kind, &binding.shape) {
                (BindingKind::Field, FieldShape::Field(resolve)) => {
                    bind_plain_field(registry, &binding, field_name, resolve.clone())
                }
                (BindingKind::Field, FieldShape::FieldById(resolve)) => {
                    bind_field_by_id(registry, &binding, field_name, resolve.clone())?
                }
                (BindingKind::List, FieldShape::List(resolve)) => {
                    bind_list(registry, &binding, field_name, resolve.clone())
                }
                (BindingKind::Connection, FieldShape::Connection(resolve)) => {
                    bind_connection(registry, &binding, field_name, resolve.clone())
                }
                (kind, shape) => {
                    debug!(member = %binding.name, kind = kind.name(), shape = shape.name(), "member shape mismatch");
                    return Err(SchemaError::ambiguous_member(&binding.name, kind.name()));
                }
            };

            def.fields.push(field.with_metadata(binding.metadata(config)));
        }

        Ok(def)
    }
}

/// Binds mutation containers: add, update, simple-update and delete
/// mutations.
pub struct MutationBinder {
    type_name: String,
    viewer_type_name: String,
    bindings: Vec<MemberBinding>,
}

impl MutationBinder {
    /// Creates a binder for the named mutation root, returning the named
    /// viewer type in add/delete payloads.
    pub fn new(type_name: impl Into<String>, viewer_type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            viewer_type_name: viewer_type_name.into(),
            bindings: Vec::new(),
        }
    }

    /// Declares a member.
    #[must_use]
    pub fn with_member(mut self, binding: MemberBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Converts all declared members to mutation fields.
    ///
    /// # Errors
    ///
    /// Fails on duplicate member names, members whose function value does
    /// not belong to their declared kind, and entities without a usable id
    /// member.
    pub fn bind(self, registry: &TypeRegistry, config: &SchemaConfig) -> Result<ObjectTypeDef, SchemaError> {
        debug!(type_name = %self.type_name, members = self.bindings.len(), "binding mutation container");

        let mut def = ObjectTypeDef::new(&self.type_name);

        let mut seen = HashSet::new();
        for binding in self.bindings {
            let field_name = binding.field_name();
            if !seen.insert(field_name.clone()) {
                return Err(SchemaError::DuplicateMember(field_name));
            }

            let field = match (&binding.kind, &binding.shape) {
                (BindingKind::Mutation, FieldShape::Add(resolve)) => {
                    bind_add(registry, &binding, field_name, &self.viewer_type_name, resolve.clone())
                }
                (BindingKind::Mutation, FieldShape::Update(resolve)) => {
                    bind_update(registry, &binding, field_name, resolve.clone(), false)?
                }
                (BindingKind::Mutation, FieldShape::SimpleUpdate(resolve)) => {
                    bind_update(registry, &binding, field_name, resolve.clone(), true)?
                }
                (BindingKind::Mutation, FieldShape::Delete(resolve)) => {
                    bind_delete(registry, &binding, field_name, &self.viewer_type_name, resolve.clone())?
                }
                (kind, shape) => {
                    debug!(member = %binding.name, kind = kind.name(), shape = shape.name(), "member shape mismatch");
                    return Err(SchemaError::ambiguous_member(&binding.name, kind.name()));
                }
            };

            def.fields.push(field.with_metadata(binding.metadata(config)));
        }

        Ok(def)
    }
}

fn entity_type_ref(registry: &TypeRegistry, entity: &ModelType) -> SchemaTypeRef {
    if entity.has_id() {
        node_object_type(registry, entity);
        SchemaTypeRef::named(&entity.name, TypeKind::NodeObject)
    } else {
        object_type(registry, entity);
        SchemaTypeRef::named(&entity.name, TypeKind::Object)
    }
}

fn bind_plain_field(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    resolve: PlainFieldFn,
) -> FieldDefinition {
    let type_ref = entity_type_ref(registry, &binding.entity);

    FieldDefinition::new(field_name, type_ref)
        .with_arguments(binding.extra_arguments.clone())
        .with_resolver(resolve)
}

fn bind_field_by_id(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    resolve: FieldByIdFn,
) -> Result<FieldDefinition, SchemaError> {
    let entity = &binding.entity;
    let id_kind = entity.id_kind()?;
    let id_argument = to_first_lower(entity.id_member_name()?);
    let id_type = classify(&entity.id_member()?.ty);
    let type_ref = entity_type_ref(registry, entity);

    let argument_name = id_argument.clone();
    let resolver = Arc::new(move |ctx: &ResolveContext| {
        let opaque = ctx
            .string_argument(&argument_name)
            .ok_or_else(|| SchemaError::missing_argument(&argument_name))?;
        let id = GlobalId::to_local_id(opaque, id_kind)?;
        match resolve(ctx, id)? {
            Some(instance) => Ok(ModelValue::Object(instance)),
            None => Ok(ModelValue::Null),
        }
    });

    let mut arguments = vec![
        Argument::new(&id_argument, id_type)
            .required()
            .with_description(format!("id of a {}", to_first_lower(&entity.name))),
    ];
    arguments.extend(binding.extra_arguments.clone());

    Ok(FieldDefinition::new(field_name, type_ref)
        .with_arguments(arguments)
        .with_resolver(resolver))
}

fn bind_list(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    resolve: ListFn,
) -> FieldDefinition {
    let item_ref = entity_type_ref(registry, &binding.entity);

    let resolver = Arc::new(move |ctx: &ResolveContext| {
        let items = resolve(ctx)?;
        Ok(ModelValue::List(
            items.into_iter().map(ModelValue::Object).collect(),
        ))
    });

    FieldDefinition::new(field_name, SchemaTypeRef::list(item_ref))
        .with_arguments(binding.extra_arguments.clone())
        .with_resolver(resolver)
}

fn bind_connection(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    resolve: ConnectionFn,
) -> FieldDefinition {
    let entity = &binding.entity;
    entity_type_ref(registry, entity);
    let connection = connection_type(registry, entity);

    let additions: Vec<String> = binding
        .extra_arguments
        .iter()
        .map(|argument| argument.name.clone())
        .collect();
    let order_by = order_by_type(registry, entity, &additions);
    let arguments = connection_arguments(registry, entity, &binding.extra_arguments);

    let entity_name = entity.name.clone();
    let resolver = Arc::new(move |ctx: &ResolveContext| {
        let (order_by_property, ascending) = match ctx.string_argument("orderBy") {
            Some(value) => {
                if !order_by.values.iter().any(|v| v == value) {
                    return Err(SchemaError::invalid_argument(
                        "orderBy",
                        format!("{value} is not a member of {}", order_by.name),
                    ));
                }
                let (stem, direction) = value
                    .rsplit_once('_')
                    .ok_or_else(|| SchemaError::invalid_argument("orderBy", value))?;
                (stem.to_string(), direction == "ASC")
            }
            None => (String::new(), false),
        };

        let parameters = Parameters::new(
            ctx.string_argument("after").map(ToString::to_string),
            ctx.int_argument("first"),
            ctx.string_argument("before").map(ToString::to_string),
            ctx.int_argument("last"),
            order_by_property,
            ascending,
        );

        let connection = resolve(ctx, parameters)?;
        Ok(connection_value(connection, &entity_name))
    });

    FieldDefinition::new(
        field_name,
        SchemaTypeRef::named(&connection.name, TypeKind::Connection),
    )
    .with_arguments(arguments)
    .with_resolver(resolver)
}

fn bind_add(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    viewer_type_name: &str,
    resolve: MutationFn,
) -> FieldDefinition {
    let entity = binding.entity.clone();
    entity_type_ref(registry, &entity);
    let input = add_input_type(registry, &entity);
    let payload = add_payload_type(registry, &entity, viewer_type_name);

    let viewer_name = viewer_type_name.to_string();
    let payload_name = payload.name.clone();
    let resolver = Arc::new(move |ctx: &ResolveContext| {
        let wire = ctx.instance_argument("input")?;
        let domain = clone_as(wire, &entity, IdHandling::Omit)?;
        let result = resolve(ctx, domain)?;
        let payload = AddPayload::new(result, wire, ModelInstance::new(&viewer_name))?;
        Ok(add_payload_value(payload, &payload_name, &entity.name))
    });

    FieldDefinition::new(
        field_name,
        SchemaTypeRef::named(&payload.name, TypeKind::Object),
    )
    .with_arguments(vec![
        Argument::new("input", SchemaTypeRef::named(&input.name, TypeKind::Input)).required(),
    ])
    .with_resolver(resolver)
}

fn bind_update(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    resolve: MutationFn,
    simple: bool,
) -> Result<FieldDefinition, SchemaError> {
    let entity = binding.entity.clone();
    // updates address an existing entity, its id must be decodable
    entity.id_kind()?;
    entity_type_ref(registry, &entity);
    let input = if simple {
        simple_update_input_type(registry, &entity)
    } else {
        update_input_type(registry, &entity)
    };
    let payload = update_payload_type(registry, &entity);

    let payload_name = payload.name.clone();
    let resolver = Arc::new(move |ctx: &ResolveContext| {
        let wire = ctx.instance_argument("input")?;
        let domain = clone_as(wire, &entity, IdHandling::Preserve)?;
        let result = resolve(ctx, domain)?;
        let payload = UpdatePayload::new(wire, result);
        Ok(update_payload_value(payload, &payload_name))
    });

    Ok(FieldDefinition::new(
        field_name,
        SchemaTypeRef::named(&payload.name, TypeKind::Object),
    )
    .with_arguments(vec![
        Argument::new("input", SchemaTypeRef::named(&input.name, TypeKind::Input)).required(),
    ])
    .with_resolver(resolver))
}

fn bind_delete(
    registry: &TypeRegistry,
    binding: &MemberBinding,
    field_name: String,
    viewer_type_name: &str,
    resolve: DeleteFn,
) -> Result<FieldDefinition, SchemaError> {
    let entity = binding.entity.clone();
    let id_kind = entity.id_kind()?;
    let input = delete_input_type(registry, &entity);
    let payload = delete_payload_type(registry, &entity, viewer_type_name);

    let viewer_name = viewer_type_name.to_string();
    let payload_name = payload.name.clone();
    let resolver = Arc::new(move |ctx: &ResolveContext| {
        let wire = ctx.instance_argument("input")?;
        let opaque = wire
            .string_field("Id")
            .ok_or_else(|| SchemaError::missing_argument("input.id"))?;
        let id = GlobalId::to_local_id(opaque, id_kind)?;
        let ok = resolve(ctx, id, wire)?;
        let payload = DeletePayload::new(wire, id_kind, ok, ModelInstance::new(&viewer_name))?;
        Ok(delete_payload_value(payload, &payload_name))
    });

    Ok(FieldDefinition::new(
        field_name,
        SchemaTypeRef::named(&payload.name, TypeKind::Object),
    )
    .with_arguments(vec![
        Argument::new("input", SchemaTypeRef::named(&input.name, TypeKind::Input)).required(),
    ])
    .with_resolver(resolver))
}

fn edge_value(cursor: String, node: ModelInstance, entity_name: &str) -> ModelValue {
    ModelValue::Object(
        ModelInstance::new(format!("{entity_name}Edge"))
            .with_field("Cursor", ModelValue::String(cursor))
            .with_field("Node", ModelValue::Object(node)),
    )
}

fn connection_value(connection: Connection<ModelInstance>, entity_name: &str) -> ModelValue {
    let page_info = ModelInstance::new("PageInfo")
        .with_field(
            "StartCursor",
            connection
                .page_info
                .start_cursor
                .map_or(ModelValue::Null, ModelValue::String),
        )
        .with_field(
            "EndCursor",
            connection
                .page_info
                .end_cursor
                .map_or(ModelValue::Null, ModelValue::String),
        )
        .with_field(
            "HasPreviousPage",
            ModelValue::Bool(connection.page_info.has_previous_page),
        )
        .with_field(
            "HasNextPage",
            ModelValue::Bool(connection.page_info.has_next_page),
        );

    let edges = connection
        .edges
        .into_iter()
        .map(|edge| edge_value(edge.cursor, edge.node, entity_name))
        .collect();

    ModelValue::Object(
        ModelInstance::new(format!("{entity_name}Connection"))
            .with_field("Edges", ModelValue::List(edges))
            .with_field("PageInfo", ModelValue::Object(page_info))
            .with_field("Count", ModelValue::Float(connection.count as f64)),
    )
}

fn add_payload_value(
    payload: AddPayload<ModelInstance>,
    payload_name: &str,
    entity_name: &str,
) -> ModelValue {
    ModelValue::Object(
        ModelInstance::new(payload_name)
            .with_field(
                "ClientMutationId",
                payload
                    .client_mutation_id
                    .map_or(ModelValue::Null, ModelValue::String),
            )
            .with_field("Viewer", ModelValue::Object(payload.viewer))
            .with_field(
                "ChangedObjectEdge",
                edge_value(
                    payload.changed_object_edge.cursor,
                    payload.changed_object_edge.node,
                    entity_name,
                ),
            ),
    )
}

fn update_payload_value(payload: UpdatePayload<ModelInstance>, payload_name: &str) -> ModelValue {
    ModelValue::Object(
        ModelInstance::new(payload_name)
            .with_field(
                "ClientMutationId",
                payload
                    .client_mutation_id
                    .map_or(ModelValue::Null, ModelValue::String),
            )
            .with_field("ChangedObject", ModelValue::Object(payload.changed_object)),
    )
}

fn delete_payload_value(payload: DeletePayload, payload_name: &str) -> ModelValue {
    ModelValue::Object(
        ModelInstance::new(payload_name)
            .with_field(
                "ClientMutationId",
                payload
                    .client_mutation_id
                    .map_or(ModelValue::Null, ModelValue::String),
            )
            .with_field("Viewer", ModelValue::Object(payload.viewer))
            .with_field("Ok", ModelValue::Bool(payload.ok))
            .with_field("Id", payload.id.into()),
    )
}
