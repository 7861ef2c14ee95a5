//! Persistence entity shape accompanying the retry interceptor.
//!
//! An id-based rendition of the tree/branch/leaf structure the retried
//! data-access operations act on. Back-references are parent ids rather
//! than object pointers, so the structure stays plainly ownable and
//! serializable; the invariant that adding a child sets its back-reference
//! holds by construction.

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Identifier of a [`Tree`]. Guaranteed non-zero.
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct TreeId(u64);

/// Identifier of a [`Branch`]. Guaranteed non-zero.
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct BranchId(u64);

/// Identifier of a [`Leaf`]. Guaranteed non-zero.
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct LeafId(u64);

/// A leaf record, the innermost node of the structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    id: LeafId,
    branch: Option<BranchId>,
}

impl Leaf {
    /// Creates a leaf not yet attached to a branch.
    pub const fn new(id: LeafId) -> Self {
        Self { id, branch: None }
    }

    /// This leaf's identifier.
    pub const fn id(&self) -> LeafId {
        self.id
    }

    /// The branch this leaf belongs to, if attached.
    pub const fn branch(&self) -> Option<BranchId> {
        self.branch
    }

    /// Sets the back-reference to the owning branch.
    pub fn set_branch(&mut self, branch: BranchId) {
        self.branch = Some(branch);
    }
}

/// A branch node holding an ordered list of leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    id: BranchId,
    tree: Option<TreeId>,
    position: i32,
    leaves: Vec<Leaf>,
}

impl Branch {
    /// Creates a branch not yet attached to a tree, at position 0.
    pub const fn new(id: BranchId) -> Self {
        Self {
            id,
            tree: None,
            position: 0,
            leaves: Vec::new(),
        }
    }

    /// This branch's identifier.
    pub const fn id(&self) -> BranchId {
        self.id
    }

    /// The tree this branch belongs to, if attached.
    pub const fn tree(&self) -> Option<TreeId> {
        self.tree
    }

    /// Sets the back-reference to the owning tree.
    pub fn set_tree(&mut self, tree: TreeId) {
        self.tree = Some(tree);
    }

    /// This branch's position within its tree.
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Sets this branch's position within its tree.
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    /// The leaves of this branch, in insertion order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Appends a leaf, setting its branch back-reference first.
    pub fn add_leaf(&mut self, mut leaf: Leaf) {
        leaf.set_branch(self.id);
        self.leaves.push(leaf);
    }
}

/// The root container of an ordered branch list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    id: TreeId,
    branches: Vec<Branch>,
}

impl Tree {
    /// Creates an empty tree.
    pub const fn new(id: TreeId) -> Self {
        Self {
            id,
            branches: Vec::new(),
        }
    }

    /// This tree's identifier.
    pub const fn id(&self) -> TreeId {
        self.id
    }

    /// The branches of this tree, ordered by position.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Appends a branch, setting its tree back-reference and assigning its
    /// position to the insertion index so positions stay dense and ordered.
    pub fn add_branch(&mut self, mut branch: Branch) {
        branch.set_tree(self.id);
        branch.set_position(
            i32::try_from(self.branches.len()).expect("branch count exceeds i32 range"),
        );
        self.branches.push(branch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_id(raw: u64) -> TreeId {
        TreeId::try_new(raw).unwrap()
    }

    fn branch_id(raw: u64) -> BranchId {
        BranchId::try_new(raw).unwrap()
    }

    fn leaf_id(raw: u64) -> LeafId {
        LeafId::try_new(raw).unwrap()
    }

    #[test]
    fn ids_reject_zero() {
        assert!(TreeId::try_new(0).is_err());
        assert!(BranchId::try_new(0).is_err());
        assert!(LeafId::try_new(0).is_err());
    }

    #[test]
    fn add_leaf_sets_back_reference() {
        let mut branch = Branch::new(branch_id(1));
        branch.add_leaf(Leaf::new(leaf_id(10)));

        let leaf = &branch.leaves()[0];
        assert_eq!(leaf.branch(), Some(branch.id()));
    }

    #[test]
    fn leaves_keep_insertion_order() {
        let mut branch = Branch::new(branch_id(1));
        for raw in [30, 10, 20] {
            branch.add_leaf(Leaf::new(leaf_id(raw)));
        }

        let ids: Vec<u64> = branch.leaves().iter().map(|l| l.id().into()).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn add_branch_sets_back_reference_and_position() {
        let mut tree = Tree::new(tree_id(1));
        tree.add_branch(Branch::new(branch_id(5)));
        tree.add_branch(Branch::new(branch_id(6)));

        let branches = tree.branches();
        assert_eq!(branches[0].tree(), Some(tree.id()));
        assert_eq!(branches[0].position(), 0);
        assert_eq!(branches[1].position(), 1);
    }

    #[test]
    fn roundtrip_serialization() {
        let mut tree = Tree::new(tree_id(1));
        let mut branch = Branch::new(branch_id(2));
        branch.add_leaf(Leaf::new(leaf_id(3)));
        tree.add_branch(branch);

        let json = serde_json::to_string(&tree).unwrap();
        let deserialized: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, deserialized);
    }
}
