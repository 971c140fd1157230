use std::fmt::{self, Display, Write};

/// Generic tree with ordered children and one value per node.
///
/// Children are owned by value, a node therefore never appears below itself. There is no parent
/// pointer: whether a node is the root is known only by whoever is traversing the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    value: T,
    children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }
    pub fn with_children(value: T, children: impl IntoIterator<Item = Node<T>>) -> Self {
        Self {
            value,
            children: children.into_iter().collect(),
        }
    }
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
    /// Replaces the value, returning the previous one.
    pub fn set_value(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }
    pub fn into_value(self) -> T {
        self.value
    }
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }
    pub fn children_mut(&mut self) -> &mut Vec<Node<T>> {
        &mut self.children
    }
    /// Appends a child and returns it.
    pub fn add_child(&mut self, child: Node<T>) -> &mut Node<T> {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
    pub fn remove_child(&mut self, index: usize) -> Option<Node<T>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
    /// Number of nodes in this subtree, this node included.
    ///
    /// Never zero, a node always holds its own value. [`is_leaf`](Self::is_leaf) tells whether
    /// there is anything below it.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }
    /// Pre-order visit of the subtree.
    pub fn traverse<F: FnMut(&Node<T>)>(&self, mut f: F) {
        self.traverse_with_depth(|node, _| f(node));
    }
    /// Pre-order visit, the closure also receives the depth (0 for this node).
    pub fn traverse_with_depth<F: FnMut(&Node<T>, usize)>(&self, mut f: F) {
        fn visit<T, F: FnMut(&Node<T>, usize)>(node: &Node<T>, depth: usize, f: &mut F) {
            f(node, depth);
            for child in &node.children {
                visit(child, depth + 1, f);
            }
        }
        visit(self, 0, &mut f);
    }
    /// Pre-order iterator over the nodes of the subtree.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { stack: vec![self] }
    }
    pub fn find<P: FnMut(&Node<T>) -> bool>(&self, mut predicate: P) -> Option<&Node<T>> {
        self.iter().find(|n| predicate(n))
    }
    pub fn find_all<P: FnMut(&Node<T>) -> bool>(&self, mut predicate: P) -> Vec<&Node<T>> {
        self.iter().filter(|n| predicate(n)).collect()
    }
    /// Builds a tree with the same shape holding the mapped values.
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Node<U> {
        fn map_node<T, U, F: FnMut(&T) -> U>(node: &Node<T>, f: &mut F) -> Node<U> {
            Node {
                value: f(&node.value),
                children: node.children.iter().map(|c| map_node(c, f)).collect(),
            }
        }
        map_node(self, &mut f)
    }
}

impl<T: Display> Node<T> {
    /// One line per node, children indented under their parent.
    pub fn to_string_as_tree(&self) -> String {
        let mut out = String::with_capacity(self.len() * 32);
        self.traverse_with_depth(|node, depth| {
            for _ in 0..depth {
                out.push_str("    ");
            }
            let _ = writeln!(out, "{}", node.value);
        });
        out
    }
}

impl<T: Display> Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_as_tree())
    }
}

pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Node<T>;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a, T> IntoIterator for &'a Node<T> {
    type Item = &'a Node<T>;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
