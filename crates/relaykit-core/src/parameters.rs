//! Paging and sorting parameters for connection resolvers.

use crate::error::CoreError;
use crate::identification::{GlobalId, IdKind, LocalId};

/// Sort direction of a connection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Auto-filled parameter input for connection resolvers.
///
/// Carries the queried paging and sorting values; the resolver is
/// responsible for applying them to its upstream set.
#[derive(Debug, Clone)]
pub struct Parameters {
    after: Option<String>,
    before: Option<String>,
    /// Number of items requested from the start; `0` when not given.
    pub first: i32,
    /// Number of items requested from the end; `0` when not given.
    pub last: i32,
    /// The property name selected by the `orderBy` argument, empty when
    /// none was queried.
    pub order_by_property: String,
    pub order_direction: Direction,
}

impl Parameters {
    /// Creates parameters from the raw argument values of a connection
    /// query.
    pub fn new(
        after: Option<String>,
        first: Option<i32>,
        before: Option<String>,
        last: Option<i32>,
        order_by_property: impl Into<String>,
        ascending: bool,
    ) -> Self {
        Self {
            after,
            before,
            first: first.unwrap_or(0),
            last: last.unwrap_or(0),
            order_by_property: order_by_property.into(),
            order_direction: if ascending {
                Direction::Asc
            } else {
                Direction::Desc
            },
        }
    }

    /// The decoded `after` cursor, if one was queried.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] when the cursor does not decode as the
    /// given kind.
    pub fn after_id(&self, kind: IdKind) -> Result<Option<LocalId>, CoreError> {
        self.after
            .as_deref()
            .map(|cursor| GlobalId::to_local_id(cursor, kind))
            .transpose()
    }

    /// The decoded `before` cursor, if one was queried.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] when the cursor does not decode as the
    /// given kind.
    pub fn before_id(&self, kind: IdKind) -> Result<Option<LocalId>, CoreError> {
        self.before
            .as_deref()
            .map(|cursor| GlobalId::to_local_id(cursor, kind))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let parameters = Parameters::new(None, None, None, None, "", true);
        assert_eq!(parameters.first, 0);
        assert_eq!(parameters.last, 0);
        assert_eq!(parameters.order_direction, Direction::Asc);
        assert_eq!(parameters.after_id(IdKind::Int).unwrap(), None);
    }

    #[test]
    fn test_after_cursor_decodes() {
        let cursor = GlobalId::encode("Order", 7);
        let parameters = Parameters::new(Some(cursor), Some(10), None, None, "NAME", false);
        assert_eq!(
            parameters.after_id(IdKind::Int).unwrap(),
            Some(LocalId::Int(7))
        );
        assert_eq!(parameters.first, 10);
        assert_eq!(parameters.order_direction, Direction::Desc);
        assert_eq!(parameters.order_by_property, "NAME");
    }

    #[test]
    fn test_malformed_cursor_fails() {
        let parameters = Parameters::new(Some("junk".into()), None, None, None, "", true);
        assert!(parameters.after_id(IdKind::Int).is_err());
    }
}
