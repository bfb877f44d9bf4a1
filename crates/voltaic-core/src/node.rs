//! Node naming and MNA index assignment.
//!
//! SPICE node names are case-insensitive; `0` is always ground. The index
//! keeps the first casing it sees for display, uppercases for lookup, and
//! hands out dense ids in observation order so id − 1 is the MNA row of a
//! non-ground node.

use indexmap::IndexMap;

/// Identifier for a circuit node. Ground is always id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The ground node.
    pub const GROUND: NodeId = NodeId(0);

    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// MNA matrix index of this node: `None` for ground, `id - 1` otherwise.
    pub fn matrix_index(&self) -> Option<usize> {
        if self.is_ground() {
            None
        } else {
            Some(self.0 as usize - 1)
        }
    }
}

/// Ordered, case-insensitive map from node name to [`NodeId`].
///
/// The map key is the uppercased name; the value is the display name (the
/// first casing observed). Ground is pre-registered at id 0 with display
/// `"0"`, so the entry's position in the map is its id.
#[derive(Debug, Clone)]
pub struct NodeIndex {
    names: IndexMap<String, String>,
}

impl NodeIndex {
    pub fn new() -> Self {
        let mut names = IndexMap::new();
        names.insert("0".to_string(), "0".to_string());
        NodeIndex { names }
    }

    /// Look up a node, registering it on first sight. Idempotent.
    pub fn get_or_create(&mut self, name: &str) -> NodeId {
        let key = name.to_uppercase();
        let entry = self.names.entry(key);
        let id = entry.index();
        entry.or_insert_with(|| name.to_string());
        NodeId(id as u32)
    }

    /// Look up a node without registering it.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.names
            .get_index_of(&name.to_uppercase())
            .map(|i| NodeId(i as u32))
    }

    /// Display name (first-observed casing) of a node.
    pub fn display_name(&self, id: NodeId) -> &str {
        self.names
            .get_index(id.0 as usize)
            .map(|(_, display)| display.as_str())
            .unwrap_or("?")
    }

    /// Total node count, ground included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        false // ground is always present
    }

    /// Number of non-ground nodes, i.e. the node-voltage unknown count.
    pub fn num_unknowns(&self) -> usize {
        self.names.len() - 1
    }

    /// Iterate non-ground nodes in id order as `(id, display name)`.
    pub fn iter_unknowns(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.names
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, (_, display))| (NodeId(i as u32), display.as_str()))
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::new()
    }
}
