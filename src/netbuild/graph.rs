//! The output containers the orchestrator owns (spec §5/§6): a node container and an edge
//! container, each exposing `insert`/`retrieve`/`was_ignored` operations. `RoadGraph` bundles
//! both plus the emitted connection list.

use crate::netbuild::error::{ProcessError, Result};
use crate::netbuild::model::{Connection, Edge, Node};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct RoadGraph {
    nodes: HashMap<String, Node>,
    edges: HashMap<String, Edge>,
    connections: Vec<Connection>,
    ignored_edges: HashSet<String>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_exists(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Inserts a node at `(x, y)` if not already present; per spec §4.3, a second creation with
    /// the same id and a different position is silently ignored (first position wins).
    pub fn ensure_node(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| Node { id: id.to_string(), x, y });
        Ok(())
    }

    pub fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(ProcessError::EdgeInsertFailed(edge.id));
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn mark_ignored(&mut self, id: &str) {
        self.ignored_edges.insert(id.to_string());
    }

    pub fn was_ignored(&self, id: &str) -> bool {
        self.ignored_edges.contains(id)
    }

    pub fn push_connection(&mut self, connection: Connection) {
        if self.connections.iter().any(|c| c.sort_key_eq(&connection)) {
            return;
        }
        self.connections.push(connection);
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_first_position_wins() {
        let mut graph = RoadGraph::new();
        graph.ensure_node("A", 0.0, 0.0).unwrap();
        graph.ensure_node("A", 5.0, 5.0).unwrap();
        assert_eq!(graph.node("A").unwrap().x, 0.0);
    }
}
