//! The logical road-graph data model (see spec §3). This is the core's own
//! representation, built from the OpenDRIVE XML data model by [`crate::netbuild::convert`]
//! and consumed by every other `netbuild` subsystem. Units are plain `f64` metres/radians;
//! the `uom` types of the XML layer are peeled off during conversion.

use crate::road::signals::Orientation;
use enumset::{EnumSet, EnumSetType};

/// a + b·ds + c·ds² + d·ds³
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicPoly {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicPoly {
    pub fn eval(&self, ds: f64) -> f64 {
        self.a + self.b * ds + self.c * ds * ds + self.d * ds * ds * ds
    }
}

/// A cubic polynomial anchored at an arclength `s`, as used for elevation and lane-offset
/// records (§3 "Cubic Polynomial").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredCubic {
    pub s: f64,
    pub poly: CubicPoly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryShape {
    Line,
    Spiral { curv_start: f64, curv_end: f64 },
    Arc { curvature: f64 },
    Poly3(CubicPoly),
    ParamPoly3 {
        u: CubicPoly,
        v: CubicPoly,
        /// `true` when the parameter range is arc-length (`[0, length]`), `false` when
        /// normalized (`[0, 1]`).
        arc_length: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySegment {
    pub s: f64,
    pub x: f64,
    pub y: f64,
    pub hdg: f64,
    pub length: f64,
    pub shape: GeometryShape,
}

/// A vertex of a discretised road polyline, with 2D position, elevation, and the 2D arclength
/// accumulated from the road's start (used to evaluate elevation/offset/width cubics).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pos: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0, pos: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthRecord {
    pub s_offset: f64,
    pub poly: CubicPoly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRecord {
    pub s_offset: f64,
    pub max: f64,
}

/// One OpenDRIVE `<lane>`, kept inside a [`LaneSection`]. `id` is signed: 0 is the centre lane,
/// negative ids are right-hand lanes, positive ids are left-hand lanes; adjacency increases with
/// `|id|` (§3 "Lane").
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub id: i64,
    pub r#type: String,
    pub width: Vec<WidthRecord>,
    pub speed: Vec<SpeedRecord>,
    pub effective_width: f64,
    pub effective_speed: f64,
    pub predecessor: Option<i64>,
    pub successor: Option<i64>,
}

impl Lane {
    pub fn is_center(&self) -> bool {
        self.id == 0
    }

    pub fn is_right(&self) -> bool {
        self.id < 0
    }

    pub fn is_left(&self) -> bool {
        self.id > 0
    }

    /// Width cubic active at `s_offset`: the one with the largest anchor `<= s_offset`.
    pub fn width_at(&self, s_offset: f64) -> f64 {
        self.width
            .iter()
            .filter(|w| w.s_offset <= s_offset + 1e-9)
            .max_by(|a, b| a.s_offset.partial_cmp(&b.s_offset).unwrap())
            .map(|w| w.poly.eval(s_offset - w.s_offset))
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneSide {
    Left,
    Center,
    Right,
}

/// A range of arclength over which the lane configuration is constant (§3 "Lane Section").
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSection {
    pub s: f64,
    pub s_orig: f64,
    pub left: Vec<Lane>,
    pub center: Vec<Lane>,
    pub right: Vec<Lane>,
    /// OpenDRIVE lane id -> compact output-lane index, separately countable per direction via
    /// `right_lane_number`/`left_lane_number`.
    pub lane_map: std::collections::HashMap<i64, usize>,
    pub right_lane_number: usize,
    pub left_lane_number: usize,
    pub right_type: String,
    pub left_type: String,
    /// Assigned by the Edge Emitter once this section becomes part of an edge id.
    pub output_id: Option<String>,
}

impl LaneSection {
    pub fn lanes(&self, side: LaneSide) -> &[Lane] {
        match side {
            LaneSide::Left => &self.left,
            LaneSide::Center => &self.center,
            LaneSide::Right => &self.right,
        }
    }

    pub fn lane(&self, id: i64) -> Option<&Lane> {
        self.left
            .iter()
            .chain(self.center.iter())
            .chain(self.right.iter())
            .find(|l| l.id == id)
    }

    pub fn lane_mut(&mut self, id: i64) -> Option<&mut Lane> {
        self.left
            .iter_mut()
            .chain(self.center.iter_mut())
            .chain(self.right.iter_mut())
            .find(|l| l.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Predecessor,
    Successor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Road,
    Junction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPoint {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadLink {
    pub direction: LinkDirection,
    pub target: LinkTarget,
    pub target_id: String,
    pub contact_point: Option<ContactPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: String,
    pub s: f64,
    pub t: f64,
    pub orientation: Orientation,
    pub r#type: String,
}

/// An interior lane-to-lane link recorded by a junction `<connection>` element, attached to
/// whichever road is named as `incoming_road` (§3 "Connection").
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from_edge: String,
    pub from_lane: i64,
    pub from_contact_point: ContactPoint,
    pub to_edge: String,
    pub to_lane: i64,
    pub to_contact_point: ContactPoint,
    pub all: bool,
    pub shape: Option<Vec<(f64, f64, f64)>>,
    pub orig_id: Option<String>,
    pub orig_lane: Option<i64>,
}

impl Connection {
    fn sort_key(&self) -> (&str, &str, i64, i64) {
        (&self.from_edge, &self.to_edge, self.from_lane, self.to_lane)
    }

    /// Whether `self` and `other` are the same (fromEdge, toEdge, fromLane, toLane) tuple, used
    /// to deduplicate connections by set semantics (spec §3 "Connection").
    pub fn sort_key_eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl PartialOrd for Connection {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.sort_key().cmp(&other.sort_key()))
    }
}

/// A single OpenDRIVE `road`, converted into the core's internal representation (§3 "Road").
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: String,
    pub name: Option<String>,
    /// `None` means the road is *outer*; `Some(id)` (where `id` is not `"-1"`/`""`) means it is
    /// an *inner* connecting road belonging to junction `id`.
    pub junction: Option<String>,
    pub length: f64,
    pub geometry: Vec<GeometrySegment>,
    pub elevation: Vec<AnchoredCubic>,
    pub lane_offset: Vec<AnchoredCubic>,
    pub lane_sections: Vec<LaneSection>,
    pub links: Vec<RoadLink>,
    pub signals: Vec<Signal>,
    pub polyline: Vec<Vertex>,
    pub from_node: Option<String>,
    pub to_node: Option<String>,
    /// Junction `<connection>` elements whose `incoming_road` is this road.
    pub connections: Vec<Connection>,
}

impl Road {
    pub fn is_inner(&self) -> bool {
        self.junction.is_some()
    }

    pub fn is_outer(&self) -> bool {
        !self.is_inner()
    }

    pub fn link(&self, direction: LinkDirection) -> Option<&RoadLink> {
        self.links.iter().find(|l| l.direction == direction)
    }
}

#[derive(EnumSetType, Debug)]
pub enum Permission {
    Passenger,
    Bicycle,
    Pedestrian,
    Bus,
    Emergency,
    Authority,
    Rail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLane {
    pub index: usize,
    pub orig_id: i64,
    pub speed: f64,
    pub width: f64,
    pub permissions: EnumSet<Permission>,
}

/// An emitted directional edge (§3 "Output Edge").
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub polyline: Vec<Vertex>,
    pub lanes: Vec<EdgeLane>,
    pub orig_road_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
}
