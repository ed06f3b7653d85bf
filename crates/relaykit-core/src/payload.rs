//! Mutation payload models.
//!
//! Per-request values returned by mutation resolvers: each mutation flavor
//! wraps its result together with the client mutation id relayed back from
//! the input, and (for add/delete) a fresh viewer instance.

use serde::Serialize;

use crate::connection::{Edge, NodeIdentity};
use crate::error::CoreError;
use crate::identification::{GlobalId, IdKind, LocalId};
use crate::value::ModelInstance;

/// The declared member name carrying the client mutation id on inputs.
pub const CLIENT_MUTATION_ID: &str = "ClientMutationId";

fn client_mutation_id(input: &ModelInstance) -> Option<String> {
    input.string_field(CLIENT_MUTATION_ID).map(ToString::to_string)
}

/// Payload of a mutation that adds an entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPayload<T> {
    pub client_mutation_id: Option<String>,
    pub viewer: ModelInstance,
    pub changed_object_edge: Edge<T>,
}

impl<T: NodeIdentity> AddPayload<T> {
    /// Wraps the added entity in an edge, relaying the input's client
    /// mutation id.
    ///
    /// # Errors
    ///
    /// Propagates id discovery failures when building the edge.
    pub fn new(result: T, input: &ModelInstance, viewer: ModelInstance) -> Result<Self, CoreError> {
        Ok(Self {
            client_mutation_id: client_mutation_id(input),
            viewer,
            changed_object_edge: Edge::new(result)?,
        })
    }
}

/// Payload of a mutation that updates an entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload<T> {
    pub client_mutation_id: Option<String>,
    pub changed_object: T,
}

impl<T> UpdatePayload<T> {
    /// Wraps the updated entity, relaying the input's client mutation id.
    pub fn new(input: &ModelInstance, result: T) -> Self {
        Self {
            client_mutation_id: client_mutation_id(input),
            changed_object: result,
        }
    }
}

/// Payload of a mutation that deletes an entity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePayload {
    pub client_mutation_id: Option<String>,
    pub viewer: ModelInstance,
    pub ok: bool,
    pub id: LocalId,
}

impl DeletePayload {
    /// Decodes the deleted entity's id from the input and records the
    /// outcome flag.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] when the input carries no decodable id.
    pub fn new(
        input: &ModelInstance,
        id_kind: IdKind,
        ok: bool,
        viewer: ModelInstance,
    ) -> Result<Self, CoreError> {
        let opaque = input
            .string_field("Id")
            .ok_or_else(|| CoreError::decode("delete input has no id"))?;

        Ok(Self {
            client_mutation_id: client_mutation_id(input),
            viewer,
            ok,
            id: GlobalId::to_local_id(opaque, id_kind)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ModelValue;

    fn order() -> ModelInstance {
        ModelInstance::new("Order").with_field("Id", ModelValue::Int(5))
    }

    #[test]
    fn test_add_payload_wraps_result_in_edge() {
        let input = ModelInstance::new("addOrderInput")
            .with_field(CLIENT_MUTATION_ID, ModelValue::String("m-1".into()));
        let payload = AddPayload::new(order(), &input, ModelInstance::new("Viewer")).unwrap();

        assert_eq!(payload.client_mutation_id.as_deref(), Some("m-1"));
        assert_eq!(
            GlobalId::to_entity_name(&payload.changed_object_edge.cursor).unwrap(),
            "Order"
        );
    }

    #[test]
    fn test_update_payload_relays_client_mutation_id() {
        let input = ModelInstance::new("updateOrderInput")
            .with_field(CLIENT_MUTATION_ID, ModelValue::String("m-2".into()));
        let payload = UpdatePayload::new(&input, order());
        assert_eq!(payload.client_mutation_id.as_deref(), Some("m-2"));
        assert_eq!(payload.changed_object.field("Id"), Some(&ModelValue::Int(5)));
    }

    #[test]
    fn test_delete_payload_decodes_target_id() {
        let input = ModelInstance::new("deleteOrderInput")
            .with_field("Id", ModelValue::String(GlobalId::encode("Order", 5)))
            .with_field(CLIENT_MUTATION_ID, ModelValue::String("m-3".into()));
        let payload =
            DeletePayload::new(&input, IdKind::Int, true, ModelInstance::new("Viewer")).unwrap();

        assert!(payload.ok);
        assert_eq!(payload.id, LocalId::Int(5));
        assert_eq!(payload.client_mutation_id.as_deref(), Some("m-3"));
    }

    #[test]
    fn test_delete_payload_requires_id() {
        let input = ModelInstance::new("deleteOrderInput");
        assert!(DeletePayload::new(&input, IdKind::Int, true, ModelInstance::new("Viewer")).is_err());
    }
}
