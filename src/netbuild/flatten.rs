//! Walks chains of interior "connecting roads" to express every outer→outer lane pair as a
//! single direct connection, optionally synthesizing an interpolated internal shape (spec §4.5).
//!
//! An inner road carries at most one predecessor and one successor link (like any OpenDRIVE
//! road), so the walk's next hop is always determined analytically from the inner road's own
//! links plus its internal lane connectivity — there is no need for a separate "outgoing
//! connection" record per inner road.

use crate::netbuild::config::ImportConfig;
use crate::netbuild::graph::RoadGraph;
use crate::netbuild::model::{Connection, ContactPoint, LinkDirection, LinkTarget, Road};
use crate::netbuild::sink::Sink;
use std::collections::{HashMap, HashSet};

pub fn flatten_connections(
    roads: &HashMap<String, Road>,
    graph: &mut RoadGraph,
    config: &ImportConfig,
    sink: &dyn Sink,
) {
    let mut outer_ids: Vec<&String> = roads.values().filter(|r| r.is_outer()).map(|r| &r.id).collect();
    outer_ids.sort();

    for road_id in outer_ids {
        let road = &roads[road_id];
        for connection in &road.connections {
            let Some(to_road) = roads.get(&connection.to_edge) else {
                sink.warn(&format!(
                    "connection from `{}` references unknown edge `{}`",
                    connection.from_edge, connection.to_edge
                ));
                continue;
            };

            let resolved = if to_road.is_outer() {
                Some(connection.clone())
            } else {
                let mut visited = HashSet::new();
                walk(connection, roads, &mut visited, config, sink)
            };

            if let Some(resolved) = resolved.and_then(|c| resolve_edge_ids(&c, roads)) {
                graph.push_connection(resolved);
            }
        }
    }
}

/// Rewrites a road-id-keyed connection into one referencing actual output edge ids, applying the
/// `-`-prefix / section-suffix / compact-lane-index resolution of spec §4.5 last paragraph.
fn resolve_edge_ids(connection: &Connection, roads: &HashMap<String, Road>) -> Option<Connection> {
    let from_road = roads.get(&connection.from_edge)?;
    let to_road = roads.get(&connection.to_edge)?;
    let (from_edge, from_lane) = resolve_edge_ref(from_road, connection.from_lane, connection.from_contact_point)?;
    let (to_edge, to_lane) = resolve_edge_ref(to_road, connection.to_lane, connection.to_contact_point)?;
    Some(Connection {
        from_edge,
        from_lane: from_lane as i64,
        to_edge,
        to_lane: to_lane as i64,
        ..connection.clone()
    })
}

fn resolve_edge_ref(road: &Road, lane: i64, contact: ContactPoint) -> Option<(String, usize)> {
    let use_last_section = contact == ContactPoint::End && lane < 0;
    let section = if use_last_section { road.lane_sections.last()? } else { road.lane_sections.first()? };
    let index = *section.lane_map.get(&lane)?;
    let prefix = if lane < 0 { "-" } else { "" };
    let suffix = if road.lane_sections.len() > 1 { format!(".{}", section.s) } else { String::new() };
    Some((format!("{prefix}{}{suffix}", road.id), index))
}

/// Depth-first flattening walk (spec §4.5): `entry` is the already-resolved outer→inner leg;
/// returns the single outer→outer connection reached by chaining through inner roads, or `None`
/// if the chain is broken, cyclic, or does not actually connect the requested lane.
fn walk(
    entry: &Connection,
    roads: &HashMap<String, Road>,
    visited: &mut HashSet<String>,
    config: &ImportConfig,
    sink: &dyn Sink,
) -> Option<Connection> {
    if !visited.insert(entry.to_edge.clone()) {
        sink.warn(&format!(
            "circular connections in junction including roads {} and {}",
            entry.from_edge, entry.to_edge
        ));
        return None;
    }

    let inner = roads.get(&entry.to_edge)?;
    let exit_lane = resolve_lane_through(inner, entry.to_lane, entry.to_contact_point)?;

    let exit_direction = match entry.to_contact_point {
        ContactPoint::Start => LinkDirection::Successor,
        ContactPoint::End => LinkDirection::Predecessor,
    };
    let Some(link) = inner.links.iter().find(|l| l.direction == exit_direction) else {
        sink.warn(&format!("inner road `{}` has no exit link on its {:?} side", inner.id, exit_direction));
        return None;
    };

    if link.target == LinkTarget::Junction {
        sink.warn(&format!("nested junction chain through `{}` is not supported", inner.id));
        return None;
    }

    let next_contact = link.contact_point.unwrap_or(ContactPoint::Start);
    let next_road = roads.get(&link.target_id)?;

    if next_road.is_outer() {
        let shape = if config.internal_shapes { internal_shape(inner, entry, sink) } else { None };
        Some(Connection {
            from_edge: entry.from_edge.clone(),
            from_lane: entry.from_lane,
            from_contact_point: entry.from_contact_point,
            to_edge: link.target_id.clone(),
            to_lane: exit_lane,
            to_contact_point: next_contact,
            all: entry.all,
            shape,
            orig_id: Some(inner.id.clone()),
            orig_lane: Some(entry.to_lane),
        })
    } else {
        let bridged = Connection {
            from_edge: entry.from_edge.clone(),
            from_lane: entry.from_lane,
            from_contact_point: entry.from_contact_point,
            to_edge: link.target_id.clone(),
            to_lane: exit_lane,
            to_contact_point: next_contact,
            all: entry.all,
            shape: None,
            orig_id: Some(inner.id.clone()),
            orig_lane: Some(entry.to_lane),
        };
        walk(&bridged, roads, visited, config, sink)
    }
}

/// Resolves how `lane_in` on the entry side of `road` connects through to the far side, via the
/// road's own lane-section sequence (spec §4.5 "Lane connectivity across an inner road").
fn resolve_lane_through(road: &Road, lane_in: i64, contact: ContactPoint) -> Option<i64> {
    if road.lane_sections.len() <= 1 {
        return Some(lane_in);
    }
    let mut sections: Vec<&crate::netbuild::model::LaneSection> = road.lane_sections.iter().collect();
    if contact == ContactPoint::End {
        sections.reverse();
    }

    let mut current = lane_in;
    for section in sections {
        let lane = section.lane(current)?;
        let next = if contact == ContactPoint::Start { lane.successor } else { lane.predecessor };
        current = next?;
    }
    Some(current)
}

/// Laterally offsets a copy of the inner road's polyline by the cumulative half-width between
/// the centre lane and the connection's reference lane (spec §4.5 "Optional internal shape").
fn internal_shape(inner: &Road, entry: &Connection, sink: &dyn Sink) -> Option<Vec<(f64, f64, f64)>> {
    let reference_lane = inner.lane_sections.first()?.lane(entry.to_lane)?;
    let is_left = reference_lane.id > 0;

    let section = inner.lane_sections.first()?;
    let mut cumulative = 0.0;
    let mut ids: Vec<i64> = if is_left {
        section.left.iter().map(|l| l.id).collect()
    } else {
        section.right.iter().map(|l| l.id).collect()
    };
    ids.sort_by_key(|id| id.abs());
    for id in ids {
        if let Some(lane) = section.lane(id) {
            cumulative += lane.width_at(0.0);
        }
        if id == reference_lane.id {
            break;
        }
    }
    let offset = if is_left { cumulative } else { -cumulative };

    if inner.polyline.len() < 2 {
        sink.warn(&format!("degenerate geometry for internal shape on road `{}`", inner.id));
        return None;
    }

    Some(
        inner
            .polyline
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let (tx, ty) = tangent_at(&inner.polyline, i);
                let norm = (tx * tx + ty * ty).sqrt().max(1e-9);
                let (nx, ny) = (-ty / norm, tx / norm);
                (v.x - offset * nx, v.y - offset * ny, v.z)
            })
            .collect(),
    )
}

fn tangent_at(points: &[crate::netbuild::model::Vertex], i: usize) -> (f64, f64) {
    if i == 0 {
        (points[1].x - points[0].x, points[1].y - points[0].y)
    } else if i == points.len() - 1 {
        (points[i].x - points[i - 1].x, points[i].y - points[i - 1].y)
    } else {
        (points[i + 1].x - points[i - 1].x, points[i + 1].y - points[i - 1].y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::model::{Lane, LaneSection, LinkTarget, RoadLink, Vertex};
    use std::collections::HashMap as Map;

    fn inner_road_looping_to(id: &str, target: &str) -> Road {
        Road {
            id: id.to_string(),
            name: None,
            junction: Some("J".to_string()),
            length: 5.0,
            geometry: Vec::new(),
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![LaneSection {
                s: 0.0,
                s_orig: 0.0,
                left: Vec::new(),
                center: Vec::new(),
                right: vec![Lane {
                    id: -1,
                    r#type: "driving".to_string(),
                    width: Vec::new(),
                    speed: Vec::new(),
                    effective_width: 3.5,
                    effective_speed: 10.0,
                    predecessor: None,
                    successor: None,
                }],
                lane_map: Map::new(),
                right_lane_number: 1,
                left_lane_number: 0,
                right_type: "driving".to_string(),
                left_type: String::new(),
                output_id: None,
            }],
            links: vec![RoadLink {
                direction: LinkDirection::Successor,
                target: LinkTarget::Road,
                target_id: target.to_string(),
                contact_point: Some(ContactPoint::Start),
            }],
            signals: Vec::new(),
            polyline: vec![Vertex::new(0.0, 0.0), Vertex::new(5.0, 0.0)],
            from_node: None,
            to_node: None,
            connections: Vec::new(),
        }
    }

    #[test]
    fn circular_inner_chain_warns_and_emits_nothing() {
        let mut roads = Map::new();
        roads.insert("X".to_string(), inner_road_looping_to("X", "Y"));
        roads.insert("Y".to_string(), inner_road_looping_to("Y", "X"));

        let entry = Connection {
            from_edge: "A".to_string(),
            from_lane: -1,
            from_contact_point: ContactPoint::End,
            to_edge: "X".to_string(),
            to_lane: -1,
            to_contact_point: ContactPoint::Start,
            all: false,
            shape: None,
            orig_id: None,
            orig_lane: None,
        };
        let config = ImportConfig::default();
        let sink = crate::netbuild::sink::CollectingSink::default();
        let mut visited = HashSet::new();
        let result = walk(&entry, &roads, &mut visited, &config, &sink);
        assert!(result.is_none());
        assert!(!sink.warnings.borrow().is_empty());
    }
}
