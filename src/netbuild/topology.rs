//! Classifies roads as inner/outer and resolves, for every outer road endpoint, the node it
//! attaches to, across four build phases run in order (spec §4.3).

use crate::netbuild::error::{ProcessError, Result};
use crate::netbuild::graph::RoadGraph;
use crate::netbuild::model::{ContactPoint, LinkDirection, LinkTarget, Road};
use crate::netbuild::sink::Sink;
use std::collections::HashMap;

struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl BoundingBox {
    fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    fn accumulate(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self { min_x: f64::INFINITY, min_y: f64::INFINITY, max_x: f64::NEG_INFINITY, max_y: f64::NEG_INFINITY }
    }
}

pub fn build_topology(
    roads: &mut HashMap<String, Road>,
    graph: &mut RoadGraph,
    sink: &dyn Sink,
) -> Result<()> {
    phase_junction_centroids(roads, graph)?;
    phase_explicit_endpoint_links(roads, graph, sink)?;
    phase_inner_to_outer_propagation(roads, graph, sink)?;
    phase_unterminated_endpoints(roads, graph, sink)?;
    Ok(())
}

fn phase_junction_centroids(roads: &mut HashMap<String, Road>, graph: &mut RoadGraph) -> Result<()> {
    let mut boxes: HashMap<String, BoundingBox> = HashMap::new();
    for road in roads.values() {
        let Some(junction_id) = &road.junction else { continue };
        let entry = boxes.entry(junction_id.clone()).or_default();
        for v in &road.polyline {
            entry.accumulate(v.x, v.y);
        }
    }
    for (junction_id, bbox) in boxes {
        let (x, y) = bbox.center();
        graph.ensure_node(&junction_id, x, y)?;
    }
    Ok(())
}

fn set_endpoint(
    road: &mut Road,
    graph: &mut RoadGraph,
    direction: LinkDirection,
    node_id: &str,
) -> Result<()> {
    let slot = match direction {
        LinkDirection::Predecessor => &mut road.from_node,
        LinkDirection::Successor => &mut road.to_node,
    };
    match slot {
        Some(existing) if existing != node_id => {
            return Err(ProcessError::TopologyConflict {
                road: road.id.clone(),
                existing: existing.clone(),
                attempted: node_id.to_string(),
            });
        }
        Some(_) => {}
        None => *slot = Some(node_id.to_string()),
    }
    let _ = graph;
    Ok(())
}

fn phase_explicit_endpoint_links(
    roads: &mut HashMap<String, Road>,
    graph: &mut RoadGraph,
    sink: &dyn Sink,
) -> Result<()> {
    let inner_ids: std::collections::HashSet<String> =
        roads.values().filter(|r| r.is_inner()).map(|r| r.id.clone()).collect();

    let mut road_ids: Vec<String> = roads.values().filter(|r| r.is_outer()).map(|r| r.id.clone()).collect();
    road_ids.sort();

    for road_id in road_ids {
        let links = roads.get(&road_id).map(|r| r.links.clone()).unwrap_or_default();
        for link in links {
            match link.target {
                LinkTarget::Junction => {
                    if graph.node_exists(&link.target_id) {
                        let road = roads.get_mut(&road_id).unwrap();
                        set_endpoint(road, graph, link.direction, &link.target_id)?;
                    } else {
                        sink.warn(&format!("road `{road_id}` links to unknown junction `{}`", link.target_id));
                    }
                }
                LinkTarget::Road if inner_ids.contains(&link.target_id) => {
                    if let Some(inner) = roads.get(&link.target_id) {
                        if let Some(junction_id) = inner.junction.clone() {
                            let road = roads.get_mut(&road_id).unwrap();
                            set_endpoint(road, graph, link.direction, &junction_id)?;
                        }
                    }
                }
                LinkTarget::Road => {
                    if roads.contains_key(&link.target_id) {
                        let mut pair = [road_id.clone(), link.target_id.clone()];
                        pair.sort();
                        let node_id = format!("{}.{}", pair[0], pair[1]);
                        graph.ensure_node_lazy(&node_id, roads, &road_id, &link.target_id);
                        let road = roads.get_mut(&road_id).unwrap();
                        set_endpoint(road, graph, link.direction, &node_id)?;
                        if let Some(other) = roads.get_mut(&link.target_id) {
                            let other_direction = match link.contact_point {
                                Some(ContactPoint::Start) => LinkDirection::Predecessor,
                                _ => LinkDirection::Successor,
                            };
                            set_endpoint(other, graph, other_direction, &node_id)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn phase_inner_to_outer_propagation(
    roads: &mut HashMap<String, Road>,
    graph: &mut RoadGraph,
    _sink: &dyn Sink,
) -> Result<()> {
    let inner_links: Vec<(String, crate::netbuild::model::RoadLink)> = roads
        .values()
        .filter(|r| r.is_inner())
        .flat_map(|r| r.links.iter().map(move |l| (r.junction.clone().unwrap(), l.clone())))
        .collect();

    let mut missing: Vec<(String, LinkDirection)> = Vec::new();
    for road in roads.values().filter(|r| r.is_outer()) {
        if road.from_node.is_none() {
            missing.push((road.id.clone(), LinkDirection::Predecessor));
        }
        if road.to_node.is_none() {
            missing.push((road.id.clone(), LinkDirection::Successor));
        }
    }

    for (road_id, direction) in missing {
        for (junction_id, link) in &inner_links {
            if link.target != LinkTarget::Road || link.target_id != road_id {
                continue;
            }
            let matches_direction = match link.contact_point {
                Some(ContactPoint::Start) => direction == LinkDirection::Predecessor,
                Some(ContactPoint::End) => direction == LinkDirection::Successor,
                None => true,
            };
            if !matches_direction {
                continue;
            }
            if let Some(road) = roads.get_mut(&road_id) {
                set_endpoint(road, graph, direction, junction_id)?;
            }
            break;
        }
    }
    Ok(())
}

fn phase_unterminated_endpoints(
    roads: &mut HashMap<String, Road>,
    graph: &mut RoadGraph,
    _sink: &dyn Sink,
) -> Result<()> {
    for road in roads.values_mut().filter(|r| r.is_outer()) {
        if road.from_node.is_none() {
            let node_id = format!("{}.begin", road.id);
            if let Some(v) = road.polyline.first() {
                graph.ensure_node(&node_id, v.x, v.y)?;
            }
            road.from_node = Some(node_id);
        }
        if road.to_node.is_none() {
            let node_id = format!("{}.end", road.id);
            if let Some(v) = road.polyline.last() {
                graph.ensure_node(&node_id, v.x, v.y)?;
            }
            road.to_node = Some(node_id);
        }
    }
    Ok(())
}

impl RoadGraph {
    fn ensure_node_lazy(
        &mut self,
        node_id: &str,
        roads: &HashMap<String, Road>,
        a: &str,
        b: &str,
    ) {
        if self.node_exists(node_id) {
            return;
        }
        let pos = roads
            .get(a)
            .and_then(|r| r.polyline.first())
            .or_else(|| roads.get(b).and_then(|r| r.polyline.first()));
        if let Some(v) = pos {
            let _ = self.ensure_node(node_id, v.x, v.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::model::Vertex;
    use crate::netbuild::sink::CollectingSink;

    fn outer_road(id: &str) -> Road {
        Road {
            id: id.to_string(),
            name: None,
            junction: None,
            length: 10.0,
            geometry: Vec::new(),
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: Vec::new(),
            links: Vec::new(),
            signals: Vec::new(),
            polyline: vec![Vertex::new(0.0, 0.0), Vertex::new(10.0, 0.0)],
            from_node: None,
            to_node: None,
            connections: Vec::new(),
        }
    }

    #[test]
    fn unterminated_endpoints_get_synthesized_nodes() {
        let mut roads = HashMap::new();
        roads.insert("R".to_string(), outer_road("R"));
        let mut graph = RoadGraph::new();
        let sink = CollectingSink::default();
        build_topology(&mut roads, &mut graph, &sink).unwrap();
        let road = roads.get("R").unwrap();
        assert_eq!(road.from_node.as_deref(), Some("R.begin"));
        assert_eq!(road.to_node.as_deref(), Some("R.end"));
    }

    #[test]
    fn double_binding_conflicts() {
        let mut road = outer_road("R");
        road.from_node = Some("A".to_string());
        let mut graph = RoadGraph::new();
        let err = set_endpoint(&mut road, &mut graph, LinkDirection::Predecessor, "B").unwrap_err();
        matches!(err, ProcessError::TopologyConflict { .. });
    }
}
