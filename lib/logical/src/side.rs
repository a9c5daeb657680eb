use crate::{AlgebraNodeId, AlgebraTree};
use rdf_streams_model::Side;

/// Returns on which side of its parent's binary operator `node` is located.
///
/// Returns [None] if the node is the root or if its parent is not a binary operator.
pub fn side_of(tree: &AlgebraTree, node: AlgebraNodeId) -> Option<Side> {
    let parent = tree.parent(node)?;
    let (left, right) = tree[parent].kind().binary_operands()?;
    if left == node {
        Some(Side::Left)
    } else if right == node {
        Some(Side::Right)
    } else {
        None
    }
}
