//! Turns a road's parametric geometry segments into a discretised 3D polyline (spec §4.1).
//!
//! Per-segment discretisation, elevation lift, lateral lane-offset shift and projection are all
//! applied here, in that order, directly onto [`model::Road::polyline`].

use crate::netbuild::config::ImportConfig;
use crate::netbuild::model::{CubicPoly, GeometryShape, Road, Vertex};
use crate::netbuild::projection::Projection;
use crate::netbuild::sink::Sink;

const EPSILON: f64 = 1e-6;

fn almost_same(a: (f64, f64), b: (f64, f64)) -> bool {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt() <= EPSILON
}

/// Samples the Fresnel-like clothoid kernel at arclength `t` for unit curvature rate, by
/// numerical integration (spec §9: no closed-form Fresnel dependency in the teacher's stack).
fn fresnel_kernel(t: f64, curv_rate: f64, curv_start: f64, steps: usize) -> (f64, f64, f64) {
    let dt = t / steps as f64;
    let (mut x, mut y, mut theta) = (0.0, 0.0, 0.0);
    for i in 0..steps {
        let s0 = i as f64 * dt;
        let s1 = s0 + dt;
        let theta0 = curv_start * s0 + 0.5 * curv_rate * s0 * s0;
        let theta1 = curv_start * s1 + 0.5 * curv_rate * s1 * s1;
        x += 0.5 * (theta0.cos() + theta1.cos()) * dt;
        y += 0.5 * (theta0.sin() + theta1.sin()) * dt;
        theta = theta1;
    }
    (x, y, theta)
}

fn discretize_line(s_start: f64, x: f64, y: f64, hdg: f64, length: f64, resolution: f64) -> Vec<Vertex> {
    let n = ((length / resolution).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let ds = (i as f64 / n as f64) * length;
        points.push(Vertex::new(x + ds * hdg.cos(), y + ds * hdg.sin()).with_pos(s_start + ds));
    }
    points
}

fn discretize_arc(s_start: f64, x: f64, y: f64, hdg: f64, length: f64, curvature: f64, resolution: f64) -> Vec<Vertex> {
    if curvature.abs() < f64::EPSILON {
        return discretize_line(s_start, x, y, hdg, length, resolution);
    }
    let radius = 1.0 / curvature;
    let cx = x - radius * hdg.sin();
    let cy = y + radius * hdg.cos();

    let n = ((length / resolution).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let ds = (i as f64 / n as f64) * length;
        let theta = hdg + ds * curvature;
        let px = cx + radius * theta.sin();
        let py = cy - radius * theta.cos();
        points.push(Vertex::new(px, py).with_pos(s_start + ds));
    }
    points
}

fn discretize_spiral(
    s_start: f64,
    x: f64,
    y: f64,
    hdg: f64,
    length: f64,
    curv_start: f64,
    curv_end: f64,
    resolution: f64,
    sink: &dyn Sink,
) -> Vec<Vertex> {
    if length <= 0.0 || (curv_end - curv_start).abs() < f64::EPSILON {
        sink.warn("degenerate spiral: zero length or constant curvature, recording only the start point");
        return vec![Vertex::new(x, y).with_pos(s_start)];
    }
    let curv_rate = (curv_end - curv_start) / length;
    let n = ((length / resolution).ceil() as usize).max(1);
    let steps_per_sample = 8;
    let (_, _, t0) = fresnel_kernel(0.0, curv_rate, curv_start, 1);

    let mut points = Vec::with_capacity(n + 1);
    let (origin_x, origin_y, _) = (0.0, 0.0, t0);
    let rotation = hdg - t0;
    for i in 0..=n {
        let ds = (i as f64 / n as f64) * length;
        let (kx, ky, _) = fresnel_kernel(ds, curv_rate, curv_start, steps_per_sample.max(1));
        let rx = kx - origin_x;
        let ry = ky - origin_y;
        let px = x + rx * rotation.cos() - ry * rotation.sin();
        let py = y + rx * rotation.sin() + ry * rotation.cos();
        points.push(Vertex::new(px, py).with_pos(s_start + ds));
    }
    points
}

fn discretize_poly3(s_start: f64, x: f64, y: f64, hdg: f64, length: f64, poly: &CubicPoly, resolution: f64) -> Vec<Vertex> {
    let n = ((length / resolution).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let u = (i as f64 / n as f64) * length;
        let v = poly.eval(u);
        let px = x + u * hdg.cos() - v * hdg.sin();
        let py = y + u * hdg.sin() + v * hdg.cos();
        points.push(Vertex::new(px, py).with_pos(s_start + u));
    }
    points
}

fn discretize_param_poly3(
    s_start: f64,
    x: f64,
    y: f64,
    hdg: f64,
    length: f64,
    u_poly: &CubicPoly,
    v_poly: &CubicPoly,
    arc_length: bool,
    resolution: f64,
) -> Vec<Vertex> {
    let n = ((length / resolution).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = if arc_length {
            (i as f64 / n as f64) * length
        } else {
            i as f64 / n as f64
        };
        let u = u_poly.eval(t);
        let v = v_poly.eval(t);
        let px = x + u * hdg.cos() - v * hdg.sin();
        let py = y + u * hdg.sin() + v * hdg.cos();
        points.push(Vertex::new(px, py).with_pos(s_start + (i as f64 / n as f64) * length));
    }
    points
}

fn elevation_at(road: &Road, pos: f64) -> f64 {
    road.elevation
        .iter()
        .filter(|e| e.s <= pos + EPSILON)
        .max_by(|a, b| a.s.partial_cmp(&b.s).unwrap())
        .map(|e| e.poly.eval(pos - e.s))
        .unwrap_or(0.0)
}

fn lane_offset_at(road: &Road, pos: f64) -> f64 {
    road.lane_offset
        .iter()
        .filter(|o| o.s <= pos + EPSILON)
        .max_by(|a, b| a.s.partial_cmp(&b.s).unwrap())
        .map(|o| o.poly.eval(pos - o.s))
        .unwrap_or(0.0)
}

/// Builds [`Road::polyline`] from [`Road::geometry`], applying elevation, lane-offset and
/// projection in sequence (spec §4.1). Leaves `road.polyline` empty when projection fails or the
/// road has no geometry, per the degrade-and-discard rule.
pub fn build_polyline(road: &mut Road, config: &ImportConfig, projection: &dyn Projection, sink: &dyn Sink) {
    let mut raw: Vec<Vertex> = Vec::new();
    for seg in &road.geometry {
        let mut pts = match seg.shape {
            GeometryShape::Line => discretize_line(seg.s, seg.x, seg.y, seg.hdg, seg.length, config.curve_resolution),
            GeometryShape::Arc { curvature } => {
                discretize_arc(seg.s, seg.x, seg.y, seg.hdg, seg.length, curvature, config.curve_resolution)
            }
            GeometryShape::Spiral { curv_start, curv_end } => discretize_spiral(
                seg.s,
                seg.x,
                seg.y,
                seg.hdg,
                seg.length,
                curv_start,
                curv_end,
                config.curve_resolution,
                sink,
            ),
            GeometryShape::Poly3(poly) => {
                discretize_poly3(seg.s, seg.x, seg.y, seg.hdg, seg.length, &poly, config.curve_resolution)
            }
            GeometryShape::ParamPoly3 { u, v, arc_length } => {
                discretize_param_poly3(seg.s, seg.x, seg.y, seg.hdg, seg.length, &u, &v, arc_length, config.curve_resolution)
            }
        };

        if let (Some(prev), Some(first)) = (raw.last(), pts.first()) {
            if almost_same((prev.x, prev.y), (first.x, first.y)) {
                raw.pop();
            } else {
                sink.warn(&format!("Mismatched geometry on road `{}` at s={}", road.id, seg.s));
            }
        }
        raw.append(&mut pts);
    }

    if raw.is_empty() {
        road.polyline = raw;
        return;
    }

    if config.min_dist > 0.0 {
        let mut filtered: Vec<Vertex> = Vec::with_capacity(raw.len());
        for v in raw {
            if let Some(last) = filtered.last() {
                let dx: f64 = v.x - last.x;
                let dy: f64 = v.y - last.y;
                if (dx * dx + dy * dy).sqrt() < config.min_dist {
                    continue;
                }
            }
            filtered.push(v);
        }
        raw = filtered;
    }

    for v in &mut raw {
        v.z = elevation_at(road, v.pos);
    }

    apply_lane_offset(&mut raw, road, sink);

    for v in &mut raw {
        match projection.project(v.x, v.y) {
            Some((px, py)) => {
                v.x = px;
                v.y = py;
            }
            None => {
                sink.warn(&format!("projection failed for road `{}`, discarding geometry", road.id));
                road.polyline = Vec::new();
                return;
            }
        }
    }

    road.polyline = raw;
}

fn apply_lane_offset(points: &mut [Vertex], road: &Road, sink: &dyn Sink) {
    if road.lane_offset.is_empty() {
        return;
    }
    for i in 0..points.len() {
        let offset = lane_offset_at(road, points[i].pos);
        if offset.abs() < EPSILON {
            continue;
        }
        let (tx, ty) = tangent_at(points, i);
        let norm = (tx * tx + ty * ty).sqrt();
        if norm < EPSILON {
            sink.warn(&format!("degenerate tangent while shifting road `{}`, leaving vertex unshifted", road.id));
            continue;
        }
        let (nx, ny) = (-ty / norm, tx / norm);
        points[i].x -= offset * nx;
        points[i].y -= offset * ny;
    }
}

fn tangent_at(points: &[Vertex], i: usize) -> (f64, f64) {
    if points.len() < 2 {
        return (1.0, 0.0);
    }
    if i == 0 {
        (points[1].x - points[0].x, points[1].y - points[0].y)
    } else if i == points.len() - 1 {
        (points[i].x - points[i - 1].x, points[i].y - points[i - 1].y)
    } else {
        (points[i + 1].x - points[i - 1].x, points[i + 1].y - points[i - 1].y)
    }
}

impl Vertex {
    fn with_pos(mut self, pos: f64) -> Self {
        self.pos = pos;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::model::GeometrySegment;
    use crate::netbuild::projection::IdentityProjection;
    use crate::netbuild::sink::CollectingSink;

    fn road_with(geometry: Vec<GeometrySegment>) -> Road {
        Road {
            id: "R".into(),
            name: None,
            junction: None,
            length: geometry.iter().map(|g| g.length).sum(),
            geometry,
            elevation: Vec::new(),
            lane_offset: Vec::new(),
            lane_sections: Vec::new(),
            links: Vec::new(),
            signals: Vec::new(),
            polyline: Vec::new(),
            from_node: None,
            to_node: None,
            connections: Vec::new(),
        }
    }

    #[test]
    fn straight_line_has_two_endpoints() {
        let mut road = road_with(vec![GeometrySegment {
            s: 0.0,
            x: 0.0,
            y: 0.0,
            hdg: 0.0,
            length: 100.0,
            shape: GeometryShape::Line,
        }]);
        let config = ImportConfig::default();
        let sink = CollectingSink::default();
        build_polyline(&mut road, &config, &IdentityProjection, &sink);
        assert!(road.polyline.len() >= 2);
        let first = road.polyline.first().unwrap();
        let last = road.polyline.last().unwrap();
        assert!((first.x - 0.0).abs() < 1e-6 && (first.y - 0.0).abs() < 1e-6);
        assert!((last.x - 100.0).abs() < 1e-6 && (last.y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn zero_rate_spiral_warns_and_yields_single_point() {
        let mut road = road_with(vec![GeometrySegment {
            s: 0.0,
            x: 0.0,
            y: 0.0,
            hdg: 0.0,
            length: 10.0,
            shape: GeometryShape::Spiral { curv_start: 0.0, curv_end: 0.0 },
        }]);
        let config = ImportConfig::default();
        let sink = CollectingSink::default();
        build_polyline(&mut road, &config, &IdentityProjection, &sink);
        assert_eq!(road.polyline.len(), 1);
        assert_eq!(sink.warnings.borrow().len(), 1);
    }

    #[test]
    fn constant_curvature_arc_stays_on_circle() {
        let curvature = 0.1;
        let mut road = road_with(vec![GeometrySegment {
            s: 0.0,
            x: 0.0,
            y: 0.0,
            hdg: 0.0,
            length: 20.0,
            shape: GeometryShape::Arc { curvature },
        }]);
        let config = ImportConfig::default();
        let sink = CollectingSink::default();
        build_polyline(&mut road, &config, &IdentityProjection, &sink);
        let radius = 1.0 / curvature;
        let cx = 0.0;
        let cy = radius;
        for v in &road.polyline {
            let d = ((v.x - cx).powi(2) + (v.y - cy).powi(2)).sqrt();
            assert!((d - radius).abs() < 1e-6);
        }
    }
}
