//! The road-graph builder core (spec §1-§9): converts a parsed OpenDRIVE document into a
//! directed, lane-resolved road graph suitable for traffic-simulation network building.
//!
//! The pipeline is five stages, each its own module, run in order by [`build`]:
//! geometry discretisation ([`geometry`]), lane-section reshaping ([`reshape`]), topology
//! resolution ([`topology`]), edge emission ([`edge`]), and junction-connection flattening
//! ([`flatten`]). [`convert`] bridges the XML data model (`crate::road`/`crate::lane`/
//! `crate::junction`) into the plain [`model`] types those stages operate on.

pub mod config;
pub mod convert;
pub mod edge;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod projection;
pub mod reshape;
pub mod sink;
pub mod topology;
pub mod types;

pub use config::ImportConfig;
pub use error::ProcessError;
pub use graph::RoadGraph;
pub use projection::Projection;
pub use sink::Sink;
pub use types::TypeCatalogue;

/// Runs the full pipeline over an already-parsed document and returns the resulting graph.
pub fn build(
    drive: &crate::core::OpenDrive,
    config: &ImportConfig,
    catalogue: &TypeCatalogue,
    projection: &dyn Projection,
    sink: &dyn Sink,
) -> error::Result<RoadGraph> {
    let mut roads = convert::convert(drive);

    for road in roads.values_mut() {
        geometry::build_polyline(road, config, projection, sink);
    }

    let mut roads = reshape::reshape_all(roads, config, catalogue, sink);

    let mut graph = RoadGraph::new();
    topology::build_topology(&mut roads, &mut graph, sink)?;
    edge::emit_edges(&roads, &mut graph, config, catalogue, sink);
    flatten::flatten_connections(&roads, &mut graph, config, sink);

    Ok(graph)
}
