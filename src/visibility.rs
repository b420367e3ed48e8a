use smallvec::SmallVec;

use crate::model::TreeModel;

/// Returns the ids visible from `root` in pre-order.
///
/// Every node reached is included; children are only descended into when the
/// node is expanded, so `root` itself is always first. An unknown `root`
/// yields an empty list.
pub fn visible_ids<T: TreeModel>(model: &T, root: &T::Id) -> Vec<T::Id> {
    if !model.contains(root) {
        return Vec::new();
    }

    let mut visible = Vec::with_capacity(model.size_hint());
    let mut stack: SmallVec<[&T::Id; 32]> = SmallVec::new();
    stack.push(root);
    while let Some(node) = stack.pop() {
        visible.push(node.clone());
        if model.is_expanded(node) {
            // Reverse so siblings pop in declaration order.
            stack.extend(model.children(node).iter().rev());
        }
    }
    visible
}

/// Visible ids starting from the model's own root.
pub fn visible_from_root<T: TreeModel>(model: &T) -> Vec<T::Id> {
    model
        .root()
        .map(|root| visible_ids(model, root))
        .unwrap_or_default()
}
