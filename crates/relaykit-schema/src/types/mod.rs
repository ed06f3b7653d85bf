//! Schema type synthesis.
//!
//! Builds the concrete object, node, connection, input, payload, enumeration
//! and order-by type descriptors out of model types, caching every derived
//! descriptor by canonical name.
//!
//! - [`object`] - Object and node-object types, the `Node` capability
//! - [`connection`] - Connection, edge and page-info types and arguments
//! - [`order_by`] - Order-by enumerations over sortable fields
//! - [`enumeration`] - Enumeration types from declared enums
//! - [`input`] - Mutation input types
//! - [`payload`] - Mutation payload types

pub mod connection;
pub mod enumeration;
pub mod input;
pub mod object;
pub mod order_by;
pub mod payload;

pub use connection::{connection_arguments, connection_type, edge_type, page_info_type};
pub use enumeration::enumeration_type;
pub use input::{
    add_input_type, delete_input_type, input_type_def, simple_update_input_type, update_input_type,
};
pub use object::{node_interface, node_object_type, object_type};
pub use order_by::order_by_type;
pub use payload::{add_payload_type, delete_payload_type, update_payload_type};
