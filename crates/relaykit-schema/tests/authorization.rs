//! Integration tests for the authorization validation pass.
//!
//! These tests verify that per-field authentication and role requirements
//! are enforced over whole selection trees before resolution.

use std::sync::Arc;

use async_graphql_parser::parse_query;

use relaykit_core::{
    Connection, FieldMetadata, MemberType, ModelInstance, ModelType, ModelValue, SchemaTypeRef,
    TypeKind, TypeRegistry,
};
use relaykit_schema::{
    AuthorizationValidator, BindingKind, FieldDefinition, FieldShape, MemberBinding,
    MutationBinder, ObjectTypeDef, ResolveContext, Schema, SchemaConfig, UserContext,
    ValidationCode, ViewerBinder,
};

fn order_model() -> Arc<ModelType> {
    Arc::new(
        ModelType::new("Order")
            .with_member("Id", MemberType::Uuid)
            .with_member("Name", MemberType::String),
    )
}

/// Builds a schema with one public connection, one field requiring
/// authentication and one field requiring the admin role.
fn schema() -> Schema {
    let registry = TypeRegistry::new();
    let config = SchemaConfig::default();

    let viewer = ViewerBinder::new("Viewer")
        .with_member(
            MemberBinding::new(
                "Orders",
                BindingKind::Connection,
                order_model(),
                FieldShape::Connection(Arc::new(|_, _| Ok(Connection::build(None)?))),
            )
            .require_authentication(false),
        )
        .with_member(
            MemberBinding::new(
                "Account",
                BindingKind::Field,
                order_model(),
                FieldShape::Field(Arc::new(|_| Ok(ModelValue::Null))),
            )
            .require_authentication(true),
        )
        .with_member(
            MemberBinding::new(
                "Audit",
                BindingKind::Field,
                order_model(),
                FieldShape::Field(Arc::new(|_| Ok(ModelValue::Null))),
            )
            .require_authentication(false)
            .with_roles(["admin"]),
        )
        .bind(&registry, &config)
        .unwrap();

    let mutation = MutationBinder::new("Mutation", "Viewer")
        .with_member(
            MemberBinding::new(
                "AddOrder",
                BindingKind::Mutation,
                order_model(),
                FieldShape::Add(Arc::new(|_, input| Ok(input))),
            )
            .require_authentication(true),
        )
        .bind(&registry, &config)
        .unwrap();

    let query = ObjectTypeDef::new("Query").with_field(
        FieldDefinition::new("viewer", SchemaTypeRef::named("Viewer", TypeKind::NodeObject))
            .with_metadata(FieldMetadata::with_authentication(false))
            .with_resolver(Arc::new(|_| {
                Ok(ModelValue::Object(ModelInstance::new("Viewer")))
            })),
    );

    Schema::builder()
        .with_query(query)
        .with_mutation(mutation)
        .with_container(viewer)
        .build(&registry)
        .unwrap()
}

#[test]
fn test_public_field_is_open_to_anonymous_users() {
    let schema = schema();
    let document =
        parse_query("{ viewer { orders { edges { node { name } } } } }").unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    // end-to-end: the public field also resolves without errors
    let ctx = ResolveContext::new(UserContext::anonymous());
    let viewer = schema.query().field("viewer").unwrap().resolve(&ctx).unwrap();
    assert!(viewer.as_instance().is_some());
    let orders = schema.container("Viewer").unwrap().field("orders").unwrap();
    assert!(orders.resolve(&ctx).is_ok());
}

#[test]
fn test_protected_field_rejects_anonymous_users() {
    let schema = schema();
    let document = parse_query("{ viewer { account { name } } }").unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ValidationCode::NotAuthorized);
    assert_eq!(errors[0].path, vec!["viewer", "account"]);
}

#[test]
fn test_protected_field_admits_authenticated_users() {
    let schema = schema();
    let document = parse_query("{ viewer { account { name } } }").unwrap();
    let user = UserContext::authenticated("u-1", "ada", Vec::<String>::new());

    let errors = AuthorizationValidator::validate(&schema, &document, &user);
    assert!(errors.is_empty());
}

#[test]
fn test_role_requirement_rejects_users_without_the_role() {
    let schema = schema();
    let document = parse_query("{ viewer { audit { name } } }").unwrap();
    let user = UserContext::authenticated("u-1", "ada", Vec::<String>::new());

    let errors = AuthorizationValidator::validate(&schema, &document, &user);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ValidationCode::NotAuthorized);
}

#[test]
fn test_role_requirement_admits_users_with_the_role() {
    let schema = schema();
    let document = parse_query("{ viewer { audit { name } } }").unwrap();
    let user = UserContext::authenticated("u-1", "ada", ["admin"]);

    let errors = AuthorizationValidator::validate(&schema, &document, &user);
    assert!(errors.is_empty());
}

#[test]
fn test_unknown_fields_report_could_not_resolve() {
    let schema = schema();
    let document = parse_query("{ viewer { ghost { name } } }").unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ValidationCode::CouldNotResolve);
    // checks stop at the unresolved node, the nested selection is not reported
    assert_eq!(errors[0].path, vec!["viewer", "ghost"]);
}

#[test]
fn test_violations_accumulate_across_the_tree() {
    let schema = schema();
    let document = parse_query("{ viewer { account { name } audit { name } ghost } }").unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors
            .iter()
            .filter(|e| e.code == ValidationCode::NotAuthorized)
            .count(),
        2
    );
    assert_eq!(
        errors
            .iter()
            .filter(|e| e.code == ValidationCode::CouldNotResolve)
            .count(),
        1
    );
}

#[test]
fn test_mutations_are_validated_against_the_mutation_root() {
    let schema = schema();
    let document =
        parse_query("mutation { addOrder(input: {name: \"x\"}) { clientMutationId } }").unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ValidationCode::NotAuthorized);
    assert_eq!(errors[0].path, vec!["addOrder"]);

    let user = UserContext::authenticated("u-1", "ada", Vec::<String>::new());
    assert!(AuthorizationValidator::validate(&schema, &document, &user).is_empty());
}

#[test]
fn test_fragments_are_walked() {
    let schema = schema();
    let document = parse_query(
        "query { viewer { ...viewerFields } } fragment viewerFields on Viewer { account { name } }",
    )
    .unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ValidationCode::NotAuthorized);
}

#[test]
fn test_introspection_selections_are_ignored() {
    let schema = schema();
    let document = parse_query("{ __typename viewer { __typename orders { count } } }").unwrap();

    let errors = AuthorizationValidator::validate(&schema, &document, &UserContext::anonymous());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}
