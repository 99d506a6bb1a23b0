//! The core [`Graph`] container.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    v: NodeId,
    w: NodeId,
    label: E,
}

/// Directed multigraph with arena storage.
///
/// Removed edges leave a hole in the edge arena so ids handed out earlier stay valid.
/// Adjacency lists keep insertion order, which makes every traversal deterministic.
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: Vec<N>,
    edges: Vec<Option<EdgeEntry<E>>>,
    out_adj: Vec<Vec<EdgeId>>,
    in_adj: Vec<Vec<EdgeId>>,
    live_edges: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            out_adj: Vec::new(),
            in_adj: Vec::new(),
            live_edges: 0,
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            out_adj: Vec::with_capacity(nodes),
            in_adj: Vec::with_capacity(nodes),
            live_edges: 0,
        }
    }

    pub fn add_node(&mut self, label: N) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(label);
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        id
    }

    pub fn has_node(&self, v: NodeId) -> bool {
        v.0 < self.nodes.len()
    }

    pub fn node(&self, v: NodeId) -> Option<&N> {
        self.nodes.get(v.0)
    }

    pub fn node_mut(&mut self, v: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(v.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<N, E> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().enumerate().map(|(ix, n)| (NodeId(ix), n))
    }

    /// Adds an edge `v -> w`. Returns `None` when either endpoint is not part of the graph.
    pub fn add_edge(&mut self, v: NodeId, w: NodeId, label: E) -> Option<EdgeId> {
        if !self.has_node(v) || !self.has_node(w) {
            return None;
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(Some(EdgeEntry { v, w, label }));
        self.out_adj[v.0].push(id);
        self.in_adj[w.0].push(id);
        self.live_edges += 1;
        Some(id)
    }

    pub fn remove_edge(&mut self, e: EdgeId) -> Option<E> {
        let entry = self.edges.get_mut(e.0)?.take()?;
        self.out_adj[entry.v.0].retain(|&x| x != e);
        self.in_adj[entry.w.0].retain(|&x| x != e);
        self.live_edges -= 1;
        Some(entry.label)
    }

    pub fn edge(&self, e: EdgeId) -> Option<&E> {
        self.entry(e).map(|entry| &entry.label)
    }

    pub fn edge_mut(&mut self, e: EdgeId) -> Option<&mut E> {
        self.edges
            .get_mut(e.0)
            .and_then(Option::as_mut)
            .map(|entry| &mut entry.label)
    }

    /// `(source, target)` of a live edge.
    pub fn endpoints(&self, e: EdgeId) -> Option<(NodeId, NodeId)> {
        self.entry(e).map(|entry| (entry.v, entry.w))
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(ix, _)| EdgeId(ix))
    }

    pub fn out_edges(&self, v: NodeId) -> &[EdgeId] {
        self.out_adj.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_edges(&self, v: NodeId) -> &[EdgeId] {
        self.in_adj.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn successors(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(v)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(_, w)| w))
    }

    pub fn predecessors(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.in_edges(v)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(u, _)| u))
    }

    /// Nodes without incoming edges, in id order.
    pub fn sources(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&v| self.in_adj[v.0].is_empty())
            .collect()
    }

    /// Nodes without outgoing edges, in id order.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&v| self.out_adj[v.0].is_empty())
            .collect()
    }

    /// Re-points the tail of `e` at `v`. The edge keeps its id and label.
    pub fn set_source(&mut self, e: EdgeId, v: NodeId) -> bool {
        if !self.has_node(v) {
            return false;
        }
        let Some(entry) = self.edges.get_mut(e.0).and_then(Option::as_mut) else {
            return false;
        };
        let old = std::mem::replace(&mut entry.v, v);
        if old != v {
            self.out_adj[old.0].retain(|&x| x != e);
            self.out_adj[v.0].push(e);
        }
        true
    }

    /// Re-points the head of `e` at `w`. The edge keeps its id and label.
    pub fn set_target(&mut self, e: EdgeId, w: NodeId) -> bool {
        if !self.has_node(w) {
            return false;
        }
        let Some(entry) = self.edges.get_mut(e.0).and_then(Option::as_mut) else {
            return false;
        };
        let old = std::mem::replace(&mut entry.w, w);
        if old != w {
            self.in_adj[old.0].retain(|&x| x != e);
            self.in_adj[w.0].push(e);
        }
        true
    }

    /// Adds edges along `nodes`, one per consecutive pair.
    pub fn set_path(&mut self, nodes: &[NodeId]) -> Vec<EdgeId>
    where
        E: Default,
    {
        nodes
            .windows(2)
            .filter_map(|pair| self.add_edge(pair[0], pair[1], E::default()))
            .collect()
    }

    fn entry(&self, e: EdgeId) -> Option<&EdgeEntry<E>> {
        self.edges.get(e.0).and_then(Option::as_ref)
    }
}
