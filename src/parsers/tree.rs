use ego_tree::NodeRef;
use scraper::Node;

/// A node of a parsed markup tree
pub type TreeNode<'a> = NodeRef<'a, Node>;

/// Walks the tree under `node` depth-first, in pre-order.
///
/// `visit` is called once per node. Returning `true` from it stops the walk
/// immediately, no further node is visited, and `walk` itself returns `true`.
/// Collecting callers always return `false` and accumulate as a side effect.
pub fn walk<'a, F>(node: TreeNode<'a>, visit: &mut F) -> bool
where
    F: FnMut(TreeNode<'a>) -> bool,
{
    if visit(node) {
        return true;
    }

    let mut child = node.first_child();
    while let Some(current) = child {
        if walk(current, visit) {
            return true;
        }
        child = current.next_sibling();
    }

    false
}

/// Returns the first node in pre-order that satisfies `predicate`
pub fn find<'a, P>(root: TreeNode<'a>, mut predicate: P) -> Option<TreeNode<'a>>
where
    P: FnMut(TreeNode<'a>) -> bool,
{
    let mut found = None;
    walk(root, &mut |node| {
        if predicate(node) {
            found = Some(node);
            true
        } else {
            false
        }
    });
    found
}

/// Returns every node that satisfies `predicate`, in document order
pub fn collect<'a, P>(root: TreeNode<'a>, mut predicate: P) -> Vec<TreeNode<'a>>
where
    P: FnMut(TreeNode<'a>) -> bool,
{
    let mut matches = Vec::new();
    walk(root, &mut |node| {
        if predicate(node) {
            matches.push(node);
        }
        false
    });
    matches
}
