//! Cursor connections.
//!
//! Wraps an ordered result page into the Relay connection shape: one edge
//! per item with a global-id cursor, plus page info. The builder has no
//! visibility into the unsliced upstream set, so `hasPreviousPage` and
//! `hasNextPage` are left to the caller, and no slicing by
//! `after`/`first`/`before`/`last` happens here.

use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::identification::{GlobalId, LocalId};
use crate::value::ModelInstance;

/// The shared node capability: a type name and a native local id, enough to
/// compute the protocol-unique global id.
pub trait NodeIdentity {
    /// The entity type name encoded into cursors and global ids.
    fn type_name(&self) -> &str;

    /// The entity's native local id.
    ///
    /// # Errors
    ///
    /// Returns an error when no id member can be discovered or its value is
    /// not an id shape.
    fn local_id(&self) -> Result<LocalId, CoreError>;
}

impl NodeIdentity for ModelInstance {
    fn type_name(&self) -> &str {
        ModelInstance::type_name(self)
    }

    fn local_id(&self) -> Result<LocalId, CoreError> {
        ModelInstance::local_id(self)
    }
}

/// Navigation hints for a connection page.
///
/// `has_previous_page`/`has_next_page` are never derived by the builder;
/// only the resolver knows the unsliced set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// One item of a connection page, addressed by its cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

impl<T: NodeIdentity> Edge<T> {
    /// Wraps a node, computing its cursor from the node identity.
    ///
    /// # Errors
    ///
    /// Propagates id discovery failures from the node.
    pub fn new(node: T) -> Result<Self, CoreError> {
        let cursor = GlobalId::encode(node.type_name(), node.local_id()?);
        Ok(Self { cursor, node })
    }
}

/// A Relay cursor connection over an ordered page of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    /// Exposed as the protocol's Float on the wire.
    #[serde(serialize_with = "serialize_count")]
    pub count: usize,
}

fn serialize_count<S: Serializer>(count: &usize, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(*count as f64)
}

impl<T: NodeIdentity> Connection<T> {
    /// Builds a connection from an ordered sequence of items, preserving
    /// input order. A missing sequence builds an empty connection.
    ///
    /// # Errors
    ///
    /// Propagates id discovery failures from the items.
    pub fn build(items: Option<Vec<T>>) -> Result<Self, CoreError> {
        let edges = items
            .unwrap_or_default()
            .into_iter()
            .map(Edge::new)
            .collect::<Result<Vec<_>, _>>()?;

        let page_info = PageInfo {
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
            has_previous_page: false,
            has_next_page: false,
        };

        Ok(Self {
            count: edges.len(),
            edges,
            page_info,
        })
    }
}

impl<T> Connection<T> {
    /// Sets the caller-known navigation hints.
    #[must_use]
    pub fn with_page_flags(mut self, has_previous_page: bool, has_next_page: bool) -> Self {
        self.page_info.has_previous_page = has_previous_page;
        self.page_info.has_next_page = has_next_page;
        self
    }
}
