//! Arena-backed tree data structure used as the MCTS node pool.
//!
//! Nodes live in a slot vector and are referenced by `NodeId` indices. Released
//! slots go on a free list and are handed out again before the arena grows, so a
//! tree that is repeatedly grown and pruned never needs more slots than the
//! largest number of nodes alive at once.

/// Index of a node inside a `Tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the tree structure
///
/// # Type Parameters
/// - `T`: The data type stored in the node
#[derive(Debug)]
pub struct Node<T>{
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T
}

#[allow(dead_code)]
impl<T> Node<T>{
    /// Checks if this node is a root (has no parent)
    #[inline]
    pub fn is_root(&self) -> bool{
        self.parent.is_none()
    }

    /// Gets the parent node if it exists
    #[inline]
    pub fn get_parent(&self) -> Option<NodeId>{
        self.parent
    }

    /// Gets the children of this node, in the order they were added
    #[inline]
    pub fn get_children(&self) -> &[NodeId]{
        &self.children
    }

    /// Gets a reference to the node's data
    #[inline]
    pub fn get(&self) -> &T{
        &self.data
    }

    /// Gets a mutable reference to the node's data
    #[inline]
    pub fn get_mut(&mut self) -> &mut T{
        &mut self.data
    }
}

/// Node pool owning every node of one or more trees.
///
/// Ownership is strictly tree-shaped: a node belongs to its parent, and releasing
/// a node releases its whole subtree.
#[derive(Debug)]
pub struct Tree<T>{
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    len: usize
}

#[allow(dead_code)]
impl<T> Tree<T>{
    /// Creates an empty node pool
    #[inline]
    pub fn new() -> Self{
        Tree { slots: Vec::new(), free: Vec::new(), len: 0 }
    }

    /// Allocates a new node holding `data`.
    ///
    /// When `parent` is given, the node is appended as the last child of the parent,
    /// so children keep their discovery order.
    ///
    /// # Parameters
    /// - `parent`: The owning node (None for a root)
    /// - `data`: The data for the new node
    ///
    /// # Returns
    /// Handle to the newly created node
    pub fn allocate(&mut self, parent: Option<NodeId>, data: T) -> NodeId{
        let node = Node { parent, children: Vec::new(), data };

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };
        self.len += 1;

        if let Some(parent) = parent{
            self.get_mut(parent).children.push(id);
        }

        id
    }

    /// Releases a node and its whole subtree back to the pool.
    ///
    /// The node is first unlinked from its parent, if it has one.
    ///
    /// # Returns
    /// The number of nodes released
    pub fn release(&mut self, id: NodeId) -> usize{
        self.detach(id);

        let mut released = 0;
        let mut stack = vec![id];

        while let Some(current) = stack.pop(){
            if let Some(node) = self.slots[current.0].take(){
                stack.extend(node.children);
                self.free.push(current.0);
                released += 1;
            }
        }

        self.len -= released;
        released
    }

    /// Unlinks a node from its parent, turning it into a root.
    ///
    /// The subtree below the node is kept intact.
    pub fn detach(&mut self, id: NodeId){
        if let Some(parent) = self.get_mut(id).parent.take(){
            self.get_mut(parent).children.retain(|child| *child != id);
        }
    }

    /// Gets a node by handle
    ///
    /// # Panics
    /// If the node has been released.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<T>{
        match &self.slots[id.0] {
            Some(node) => node,
            None => panic!("access to released node {:?}", id)
        }
    }

    /// Gets a node mutably by handle
    ///
    /// # Panics
    /// If the node has been released.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<T>{
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => panic!("access to released node {:?}", id)
        }
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize{
        self.len
    }

    /// Number of slots ever allocated, live or free
    #[inline]
    pub fn capacity(&self) -> usize{
        self.slots.len()
    }
}
