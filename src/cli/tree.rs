//! Text rendering of a network via termtree.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::Network;

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for Network {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("Empty network".to_string());
        };
        let Some(root) = self.get_node(root_idx) else {
            return Tree::new("Empty network".to_string());
        };

        fn build_tree(network: &Network, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = network.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = network.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.data.label.clone());
                        build_tree(network, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut tree = Tree::new(root.data.label.clone());
        build_tree(self, root_idx, &mut tree);
        tree
    }
}
