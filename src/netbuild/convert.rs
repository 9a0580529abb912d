//! Builds the core's logical [`Road`](crate::netbuild::model::Road) table from the existing
//! OpenDRIVE XML data model (spec §4.6). Everything OpenDRIVE-XML-specific (attribute parsing,
//! `uom` unit types) is peeled away here in favour of the core's own plain-`f64` representation;
//! downstream subsystems never see `crate::road`/`crate::lane`/`crate::junction` types.

use crate::junction::ContactPoint as JunctionContactPoint;
use crate::lane::speed::SpeedUnit;
use crate::road::element_type::ElementType;
use crate::road::geometry::geometry_type::GeometryType;
use crate::road::geometry::param_poly_3_p_range::ParamPoly3pRange;
use crate::netbuild::model::{
    AnchoredCubic, ContactPoint, CubicPoly, GeometryShape, GeometrySegment, Lane, LaneSection,
    LinkDirection, LinkTarget, Road, RoadLink, Signal, WidthRecord, SpeedRecord, Connection,
};
use std::collections::HashMap;

/// Converts every `<road>` of `drive`, attaches every junction `<connection>` to its
/// `incoming_road`, and returns the resulting road table keyed by road id.
pub fn convert(drive: &crate::core::OpenDrive) -> HashMap<String, Road> {
    let mut roads: HashMap<String, Road> = drive
        .road
        .iter()
        .map(|road| (road.id.clone(), convert_road(road)))
        .collect();

    for junction in &drive.junction {
        for connection in &junction.connection {
            attach_connection(&mut roads, &junction.id, connection);
        }
    }

    roads
}

fn convert_road(road: &crate::road::Road) -> Road {
    Road {
        id: road.id.clone(),
        name: road.name.clone(),
        junction: match road.junction.as_str() {
            "-1" | "" => None,
            id => Some(id.to_string()),
        },
        length: road.length.value,
        geometry: road.plan_view.geometry.iter().map(convert_geometry).collect(),
        elevation: road
            .elevation_profile
            .iter()
            .flat_map(|profile| &profile.elevation)
            .map(|e| AnchoredCubic {
                s: e.s.value,
                poly: CubicPoly { a: e.a, b: e.b, c: e.c, d: e.d },
            })
            .collect(),
        lane_offset: road
            .lanes
            .lane_offset
            .iter()
            .map(|o| AnchoredCubic {
                s: o.s,
                poly: CubicPoly { a: o.a, b: o.b, c: o.c, d: o.d },
            })
            .collect(),
        lane_sections: road.lanes.lane_section.iter().map(convert_lane_section).collect(),
        links: convert_links(&road.link),
        signals: road
            .signals
            .iter()
            .flat_map(|signals| &signals.signal)
            .map(|s| Signal {
                id: s.id.clone(),
                s: s.s.value,
                t: s.t.value,
                orientation: s.orientation.clone(),
                r#type: s.r#type.clone(),
            })
            .collect(),
        polyline: Vec::new(),
        from_node: None,
        to_node: None,
        connections: Vec::new(),
    }
}

fn convert_geometry(g: &crate::road::geometry::Geometry) -> GeometrySegment {
    let shape = match &g.choice {
        GeometryType::Line(_) => GeometryShape::Line,
        GeometryType::Spiral(s) => GeometryShape::Spiral {
            curv_start: s.curvature_start.value,
            curv_end: s.curvature_end.value,
        },
        GeometryType::Arc(a) => GeometryShape::Arc { curvature: a.curvature.value },
        GeometryType::Poly3(p) => GeometryShape::Poly3(CubicPoly { a: p.a, b: p.b, c: p.c, d: p.d }),
        GeometryType::ParamPoly3(p) => GeometryShape::ParamPoly3 {
            u: CubicPoly { a: p.a_u, b: p.b_u, c: p.c_u, d: p.d_u },
            v: CubicPoly { a: p.a_v, b: p.b_v, c: p.c_v, d: p.d_v },
            arc_length: matches!(p.p_range, ParamPoly3pRange::ArcLength),
        },
    };
    GeometrySegment {
        s: g.s.value,
        x: g.x.value,
        y: g.y.value,
        hdg: g.hdg.value,
        length: g.length.value,
        shape,
    }
}

fn convert_lane_section(section: &crate::lane::lane_section::LaneSection) -> LaneSection {
    let left = section
        .left
        .iter()
        .flat_map(|l| &l.lane)
        .map(|l| convert_lane(l.id, &l.base))
        .collect();
    let center = section.center.lane.iter().map(|l| convert_lane(l.id, &l.base)).collect();
    let right = section
        .right
        .iter()
        .flat_map(|r| &r.lane)
        .map(|l| convert_lane(l.id, &l.base))
        .collect();

    LaneSection {
        s: section.s,
        s_orig: section.s,
        left,
        center,
        right,
        lane_map: HashMap::new(),
        right_lane_number: 0,
        left_lane_number: 0,
        right_type: String::new(),
        left_type: String::new(),
        output_id: None,
    }
}

fn convert_lane(id: i64, base: &crate::lane::Lane) -> Lane {
    let predecessor = base
        .link
        .as_ref()
        .and_then(|l| l.predecessor.first())
        .map(|p| p.id);
    let successor = base
        .link
        .as_ref()
        .and_then(|l| l.successor.first())
        .map(|p| p.id);

    Lane {
        id,
        r#type: base.r#type.as_str().to_string(),
        width: base
            .width
            .iter()
            .map(|w| WidthRecord {
                s_offset: w.s_offset.value,
                poly: CubicPoly { a: w.a, b: w.b, c: w.c, d: w.d },
            })
            .collect(),
        speed: base
            .speed
            .iter()
            .map(|s| SpeedRecord { s_offset: s.s_offset.value, max: convert_speed(s.max, &s.unit) })
            .collect(),
        effective_width: 0.0,
        effective_speed: 0.0,
        predecessor,
        successor,
    }
}

fn convert_speed(max: f64, unit: &Option<SpeedUnit>) -> f64 {
    match unit {
        Some(SpeedUnit::KilometersPerHour) => max / 3.6,
        Some(SpeedUnit::MilesPerHour) => max * 1.609344 / 3.6,
        Some(SpeedUnit::MetersPerSecond) | None => max,
    }
}

fn convert_links(link: &Option<crate::road::link::Link>) -> Vec<RoadLink> {
    let mut out = Vec::new();
    if let Some(link) = link {
        if let Some(p) = &link.predecessor {
            out.push(convert_link(LinkDirection::Predecessor, p));
        }
        if let Some(s) = &link.successor {
            out.push(convert_link(LinkDirection::Successor, s));
        }
    }
    out
}

fn convert_link(
    direction: LinkDirection,
    ps: &crate::road::predecessor_successor::PredecessorSuccessor,
) -> RoadLink {
    RoadLink {
        direction,
        target: match ps.element_type {
            Some(ElementType::Junction) => LinkTarget::Junction,
            _ => LinkTarget::Road,
        },
        target_id: ps.element_id.clone(),
        contact_point: ps.contact_point.as_ref().map(convert_contact_point),
    }
}

fn convert_contact_point(cp: &JunctionContactPoint) -> ContactPoint {
    match cp {
        JunctionContactPoint::Start => ContactPoint::Start,
        JunctionContactPoint::End => ContactPoint::End,
    }
}

/// The OpenDRIVE `<connection>` element gives us `toContactPoint` (on the connecting road)
/// directly, but not `fromContactPoint` (on the incoming road) — that has to be derived from
/// the incoming road's own `<link>` entry pointing at this junction.
fn resolve_from_contact_point(road: &Road, junction_id: &str) -> ContactPoint {
    road.links
        .iter()
        .find(|l| l.target == LinkTarget::Junction && l.target_id == junction_id)
        .map(|l| match l.direction {
            LinkDirection::Predecessor => ContactPoint::Start,
            LinkDirection::Successor => ContactPoint::End,
        })
        .unwrap_or(ContactPoint::End)
}

fn attach_connection(
    roads: &mut HashMap<String, Road>,
    junction_id: &str,
    connection: &crate::junction::connection::Connection,
) {
    let (Some(incoming), Some(connecting)) = (&connection.incoming_road, &connection.connecting_road)
    else {
        return;
    };

    let from_contact_point = match roads.get(incoming) {
        Some(road) => resolve_from_contact_point(road, junction_id),
        None => return,
    };
    let to_contact_point = connection
        .contact_point
        .as_ref()
        .map(convert_contact_point)
        .unwrap_or(ContactPoint::Start);

    let Some(road) = roads.get_mut(incoming) else { return };
    if connection.lane_link.is_empty() {
        road.connections.push(Connection {
            from_edge: incoming.clone(),
            from_lane: 0,
            from_contact_point,
            to_edge: connecting.clone(),
            to_lane: 0,
            to_contact_point,
            all: true,
            shape: None,
            orig_id: Some(connection.id.clone()),
            orig_lane: None,
        });
        return;
    }

    for lane_link in &connection.lane_link {
        road.connections.push(Connection {
            from_edge: incoming.clone(),
            from_lane: lane_link.from,
            from_contact_point,
            to_edge: connecting.clone(),
            to_lane: lane_link.to,
            to_contact_point,
            all: false,
            shape: None,
            orig_id: Some(connection.id.clone()),
            orig_lane: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OpenDrive;

    #[test]
    fn straight_road_converts_one_section_each_side() {
        let source = r#"
            <?xml version="1.0" standalone="yes"?>
            <OpenDRIVE>
                <header revMajor="1" revMinor="4" name="" version="1.00" date="" north="0" south="0" east="0" west="0"></header>
                <road rule="RHT" name="" length="1.0000000000000000e+02" id="R" junction="-1">
                    <planView>
                        <geometry s="0" x="0" y="0" hdg="0" length="1.0000000000000000e+02">
                            <line/>
                        </geometry>
                    </planView>
                    <lanes>
                        <laneSection s="0">
                            <left>
                                <lane id="1" type="driving" level="false">
                                    <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                                </lane>
                            </left>
                            <center>
                                <lane id="0" type="driving" level="false"></lane>
                            </center>
                            <right>
                                <lane id="-1" type="driving" level="false">
                                    <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                                </lane>
                            </right>
                        </laneSection>
                    </lanes>
                </road>
            </OpenDRIVE>
        "#;
        let drive = OpenDrive::from_xml_str(source).unwrap();
        let roads = convert(&drive);
        let road = roads.get("R").unwrap();
        assert!(road.is_outer());
        assert_eq!(road.length, 100.0);
        assert_eq!(road.lane_sections.len(), 1);
        assert_eq!(road.lane_sections[0].left.len(), 1);
        assert_eq!(road.lane_sections[0].right.len(), 1);
    }
}
