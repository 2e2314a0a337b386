//! Identifier to node resolution.
//!
//! Resolution is a pure query over the live document. Nothing is cached:
//! managed nodes may mount and unmount between dispatches.

use crate::{Document, FocusTarget};

/// Resolve a focus target to the first matching node in document order.
///
/// The [`FocusTarget::Unmanaged`] sentinel never resolves, so forward sync
/// treats it exactly like an unknown identifier.
pub fn resolve<D: Document + ?Sized>(
    document: &D,
    attribute: &str,
    target: &FocusTarget,
) -> Option<D::Node> {
    let id = target.managed_id()?;
    document.query_attribute(attribute, id.as_str())
}

/// Focus target a node represents: its attribute value, or the sentinel
/// when the attribute is absent.
pub fn target_of<D: Document + ?Sized>(document: &D, attribute: &str, node: &D::Node) -> FocusTarget {
    match document.attribute(node, attribute) {
        Some(value) => FocusTarget::from(value),
        None => FocusTarget::Unmanaged,
    }
}
