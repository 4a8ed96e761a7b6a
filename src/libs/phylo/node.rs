use serde::{Deserialize, Serialize};
use std::fmt;

/// The `name` field of a nested node.
///
/// Parsed trees only carry labels. Once a leaf has been resolved against a
/// gene-family index its name becomes the family's locus tags, which is how
/// the JSON document represents it (`"name": ["tag1", "tag2"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeName {
    Label(String),
    Tags(Vec<String>),
}

impl NodeName {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            NodeName::Label(s) => Some(s),
            NodeName::Tags(_) => None,
        }
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeName::Label(s) => write!(f, "{}", s),
            NodeName::Tags(tags) => write!(f, "{}", tags.join(",")),
        }
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        NodeName::Label(s.to_string())
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        NodeName::Label(s)
    }
}

/// A tree node owning its children.
///
/// A node is a leaf exactly when `children` is `None`; the field is then
/// left out of the JSON document.
///
/// ```
/// use phylofam::libs::phylo::node::NestedNode;
/// let tree = NestedNode::internal("Inner1", vec![NestedNode::leaf("A"), NestedNode::leaf("B")]);
/// assert_eq!(
///     serde_json::to_string(&tree).unwrap(),
///     r#"{"name":"Inner1","children":[{"name":"A"},{"name":"B"}]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedNode {
    pub name: NodeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NestedNode>>,
}

impl NestedNode {
    pub fn leaf(name: impl Into<NodeName>) -> Self {
        Self {
            name: name.into(),
            children: None,
        }
    }

    pub fn internal(name: impl Into<NodeName>, children: Vec<NestedNode>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Leaves in pre-order.
    pub fn leaves(&self) -> Vec<&NestedNode> {
        let mut leaves = Vec::new();
        self.walk(&mut |node| {
            if node.is_leaf() {
                leaves.push(node);
            }
        });
        leaves
    }

    /// Names of all nodes in pre-order, parents before children.
    pub fn names(&self) -> Vec<&NodeName> {
        let mut names = Vec::new();
        self.walk(&mut |node| names.push(&node.name));
        names
    }

    pub fn count_nodes(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a NestedNode),
    {
        f(self);
        if let Some(children) = &self.children {
            for child in children {
                child.walk(f);
            }
        }
    }
}
