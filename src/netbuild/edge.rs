//! Splits every outer road into one forward and one backward edge per lane section, copying
//! lane attributes from the type catalogue and stitching intra-road continuations (spec §4.4).

use crate::netbuild::config::ImportConfig;
use crate::netbuild::graph::RoadGraph;
use crate::netbuild::model::{Connection, ContactPoint, Edge, EdgeLane, Lane, LaneSection, Permission, Road, Vertex};
use crate::netbuild::reshape::inner_connections;
use crate::netbuild::sink::Sink;
use crate::netbuild::types::TypeCatalogue;
use std::collections::HashMap;

const EPSILON: f64 = 1e-6;

pub fn emit_edges(
    roads: &HashMap<String, Road>,
    graph: &mut RoadGraph,
    config: &ImportConfig,
    catalogue: &TypeCatalogue,
    sink: &dyn Sink,
) {
    let mut road_ids: Vec<&String> = roads.keys().collect();
    road_ids.sort();

    for road_id in road_ids {
        let road = &roads[road_id];
        if road.is_inner() || road.polyline.len() < 2 {
            continue;
        }
        emit_road_edges(road, graph, config, catalogue, sink);
    }
}

fn length_2d(polyline: &[Vertex]) -> f64 {
    polyline
        .windows(2)
        .map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt())
        .sum()
}

fn sub_polyline(polyline: &[Vertex], s_from: f64, s_to: f64) -> Vec<Vertex> {
    polyline
        .iter()
        .filter(|v| v.pos >= s_from - EPSILON && v.pos <= s_to + EPSILON)
        .copied()
        .collect()
}

fn priority_from_signals(road: &Road, side_positive: bool) -> i32 {
    for signal in &road.signals {
        let orientation_matches = match signal.orientation {
            crate::road::signals::Orientation::Plus => side_positive,
            crate::road::signals::Orientation::Minus => !side_positive,
            crate::road::signals::Orientation::None => true,
        };
        if !orientation_matches {
            continue;
        }
        match signal.r#type.as_str() {
            "301" | "306" => return 2,
            "205" => return 0,
            _ => {}
        }
    }
    1
}

fn emit_road_edges(
    road: &Road,
    graph: &mut RoadGraph,
    config: &ImportConfig,
    catalogue: &TypeCatalogue,
    sink: &dyn Sink,
) {
    let mut sections = road.lane_sections.clone();
    if sections.is_empty() {
        return;
    }

    let self_loop = road.from_node.is_some() && road.from_node == road.to_node;
    if self_loop && sections.len() == 1 {
        let half = road.length / 2.0;
        let mut second = sections[0].clone();
        second.s = half;
        sections.push(second);
    }

    // cF maps nominal road arclength onto the discretised polyline's own (world) arclength, so
    // that lane-section boundaries land on the right sub-range even when lateral lane-offset
    // shifting changed the polyline's 2D length (spec §4.4 "length-correction factor cF").
    let correction_factor = {
        let l2d = length_2d(&road.polyline);
        if l2d > EPSILON {
            road.length / l2d
        } else {
            1.0
        }
    };

    let right_priority = priority_from_signals(road, true);
    let left_priority = priority_from_signals(road, false);
    let _ = (right_priority, left_priority);

    let mut prev_forward: Option<String> = None;
    let mut prev_backward: Option<String> = None;
    let mut prev_section: Option<&LaneSection> = None;

    for (idx, section) in sections.iter().enumerate() {
        let s_from = section.s;
        let s_to = sections.get(idx + 1).map(|n| n.s).unwrap_or(road.length);
        let polyline = sub_polyline(&road.polyline, s_from * correction_factor, s_to * correction_factor);
        if polyline.len() < 2 {
            continue;
        }

        let suffix = if sections.len() > 1 { format!(".{s_from}") } else { String::new() };

        if section.right_lane_number > 0 {
            let forward_id = format!("-{}{}", road.id, suffix);
            let lanes = lane_attributes(section, true, config, catalogue, sink);
            let edge = Edge {
                id: forward_id.clone(),
                from_node: node_at(road, s_from, road.from_node.as_deref()),
                to_node: node_at(road, s_to, road.to_node.as_deref()),
                polyline: polyline.clone(),
                lanes,
                orig_road_id: road.id.clone(),
            };
            if graph.insert_edge(edge).is_ok() {
                if let (Some(prev_id), Some(prev_sec)) = (&prev_forward, prev_section) {
                    for (prev_idx, cur_idx) in inner_connections(prev_sec, section, false) {
                        graph.push_connection(Connection {
                            from_edge: prev_id.clone(),
                            from_lane: prev_idx as i64,
                            from_contact_point: ContactPoint::End,
                            to_edge: forward_id.clone(),
                            to_lane: cur_idx as i64,
                            to_contact_point: ContactPoint::Start,
                            all: false,
                            shape: None,
                            orig_id: None,
                            orig_lane: None,
                        });
                    }
                }
                prev_forward = Some(forward_id);
            }
        } else {
            graph.mark_ignored(&format!("-{}{}", road.id, suffix));
        }

        if section.left_lane_number > 0 {
            let backward_id = format!("{}{}", road.id, suffix);
            let lanes = lane_attributes(section, false, config, catalogue, sink);
            let edge = Edge {
                id: backward_id.clone(),
                from_node: node_at(road, s_to, road.to_node.as_deref()),
                to_node: node_at(road, s_from, road.from_node.as_deref()),
                polyline: polyline.into_iter().rev().collect(),
                lanes,
                orig_road_id: road.id.clone(),
            };
            if graph.insert_edge(edge).is_ok() {
                if let (Some(prev_id), Some(prev_sec)) = (&prev_backward, prev_section) {
                    // Backward edges run from higher to lower s, so the current section's edge
                    // feeds into the previous (lower-s) one, not the other way around.
                    for (cur_idx, prev_idx) in inner_connections(prev_sec, section, true) {
                        graph.push_connection(Connection {
                            from_edge: backward_id.clone(),
                            from_lane: cur_idx as i64,
                            from_contact_point: ContactPoint::End,
                            to_edge: prev_id.clone(),
                            to_lane: prev_idx as i64,
                            to_contact_point: ContactPoint::Start,
                            all: false,
                            shape: None,
                            orig_id: None,
                            orig_lane: None,
                        });
                    }
                }
                prev_backward = Some(backward_id);
            }
        } else {
            graph.mark_ignored(&format!("{}{}", road.id, suffix));
        }

        prev_section = Some(section);
    }
}

fn node_at(road: &Road, pos: f64, terminal: Option<&str>) -> String {
    if (pos - 0.0).abs() < EPSILON {
        return terminal.map(str::to_string).unwrap_or_else(|| format!("{}.begin", road.id));
    }
    if (pos - road.length).abs() < EPSILON {
        return terminal.map(str::to_string).unwrap_or_else(|| format!("{}.end", road.id));
    }
    format!("{}.{pos}", road.id)
}

fn lane_attributes(
    section: &LaneSection,
    right: bool,
    config: &ImportConfig,
    catalogue: &TypeCatalogue,
    sink: &dyn Sink,
) -> Vec<EdgeLane> {
    let lanes: Vec<&Lane> = if right { section.right.iter().collect() } else { section.left.iter().collect() };
    let map: &HashMap<i64, usize> = &section.lane_map;

    let mut sorted: Vec<&Lane> = lanes;
    if right {
        sorted.sort_by_key(|l| std::cmp::Reverse(l.id.abs()));
    } else {
        sorted.sort_by_key(|l| l.id.abs());
    }

    sorted
        .into_iter()
        .filter_map(|lane| {
            let index = *map.get(&lane.id)?;
            let defaults = catalogue.get(&lane.r#type);
            let speed = if lane.effective_speed > EPSILON {
                lane.effective_speed
            } else {
                defaults.map(|d| d.speed).unwrap_or(0.0)
            };
            let mut width = if config.ignore_widths {
                defaults.map(|d| d.width).unwrap_or(3.5)
            } else if lane.effective_width > EPSILON {
                lane.effective_width
            } else {
                lane.width_at(0.0)
            };
            let mut permissions = defaults.map(|d| d.permissions).unwrap_or_default();

            if let Some(d) = defaults {
                if d.width_resolution > EPSILON {
                    width = (width / d.width_resolution).round() * d.width_resolution;
                }
                if let Some(max) = d.max_width {
                    width = width.min(max);
                }
            }

            if permissions.contains(Permission::Passenger) && width < config.min_width {
                // Retry one step of width-quantisation reduction first: rounding alone can push
                // a lane just under the minimum even though its true width is not narrow.
                if let Some(resolution) = defaults.map(|d| d.width_resolution).filter(|r| *r > EPSILON) {
                    let retried = width + resolution;
                    if retried >= config.min_width {
                        width = retried;
                    }
                }
                if width < config.min_width {
                    sink.warn(&format!(
                        "lane {} quantised below minimum width ({:.2}m); downgrading permissions",
                        lane.id, width
                    ));
                    permissions = Permission::Emergency | Permission::Authority;
                }
            }

            Some(EdgeLane { index, orig_id: lane.id, speed, width, permissions })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::model::{ContactPoint, LaneSection, Vertex};
    use crate::netbuild::sink::CollectingSink;
    use std::collections::HashMap;

    fn straight_road() -> Road {
        let mut right_lane = Lane {
            id: -1,
            r#type: "driving".to_string(),
            width: Vec::new(),
            speed: Vec::new(),
            effective_width: 3.5,
            effective_speed: 13.89,
            predecessor: None,
            successor: None,
        };
        right_lane.width.push(crate::netbuild::model::WidthRecord {
            s_offset: 0.0,
            poly: crate::netbuild::model::CubicPoly { a: 3.5, b: 0.0, c: 0.0, d: 0.0 },
        });
        let mut left_lane = right_lane.clone();
        left_lane.id = 1;

        let mut lane_map = HashMap::new();
        lane_map.insert(-1, 0);
        lane_map.insert(1, 0);
        lane_map.insert(0, 0);

        let section = LaneSection {
            s: 0.0,
            s_orig: 0.0,
            left: vec![left_lane],
            center: Vec::new(),
            right: vec![right_lane],
            lane_map,
            right_lane_number: 1,
            left_lane_number: 1,
            right_type: "driving".to_string(),
            left_type: "driving".to_string(),
            output_id: None,
        };

        Road {
            id: "R".to_string(),
            name: None,
            junction: None,
            length: 100.0,
            geometry: Vec::new(),
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: vec![section],
            links: Vec::new(),
            signals: Vec::new(),
            polyline: (0..=10)
                .map(|i| {
                    let mut v = Vertex::new(i as f64 * 10.0, 0.0);
                    v.pos = i as f64 * 10.0;
                    v
                })
                .collect(),
            from_node: Some("R.begin".to_string()),
            to_node: Some("R.end".to_string()),
            connections: Vec::new(),
        }
    }

    #[test]
    fn straight_road_emits_two_single_lane_edges() {
        let road = straight_road();
        let mut roads = HashMap::new();
        roads.insert(road.id.clone(), road);
        let mut graph = RoadGraph::new();
        graph.ensure_node("R.begin", 0.0, 0.0).unwrap();
        graph.ensure_node("R.end", 100.0, 0.0).unwrap();
        let config = ImportConfig::default();
        let catalogue = TypeCatalogue::standard();
        let sink = CollectingSink::default();
        emit_edges(&roads, &mut graph, &config, &catalogue, &sink);

        let forward = graph.edge("-R").unwrap();
        let backward = graph.edge("R").unwrap();
        assert_eq!(forward.lanes.len(), 1);
        assert_eq!(backward.lanes.len(), 1);
        let _ = ContactPoint::Start;
    }
}
