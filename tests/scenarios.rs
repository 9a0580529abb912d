//! End-to-end scenarios from literal OpenDRIVE XML through `OpenDrive::from_xml_str` into the
//! core pipeline (spec §8 "Concrete scenarios").

use netbuild::core::OpenDrive;
use netbuild::netbuild::config::ImportConfig;
use netbuild::netbuild::projection::IdentityProjection;
use netbuild::netbuild::sink::CollectingSink;
use netbuild::netbuild::types::TypeCatalogue;
use netbuild::netbuild::{build, reshape};

fn run(xml: &str) -> (netbuild::netbuild::graph::RoadGraph, CollectingSink) {
    let drive = OpenDrive::from_xml_str(xml).unwrap();
    let config = ImportConfig::default();
    let catalogue = TypeCatalogue::standard();
    let projection = IdentityProjection;
    let sink = CollectingSink::default();
    let graph = build(&drive, &config, &catalogue, &projection, &sink).unwrap();
    (graph, sink)
}

#[test]
fn straight_road_one_section_one_lane_each_side() {
    let xml = r#"
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

    let (graph, _sink) = run(xml);

    let forward = graph.edge("-R").expect("forward edge");
    let backward = graph.edge("R").expect("backward edge");
    assert_eq!(forward.lanes.len(), 1);
    assert_eq!(backward.lanes.len(), 1);
    assert_eq!(forward.from_node, "R.begin");
    assert_eq!(forward.to_node, "R.end");
    assert_eq!(backward.from_node, "R.end");
    assert_eq!(backward.to_node, "R.begin");
    let first = forward.polyline.first().unwrap();
    let last = forward.polyline.last().unwrap();
    assert!((first.x - 0.0).abs() < 1e-6);
    assert!((last.x - 100.0).abs() < 1e-6);
}

#[test]
fn road_with_speed_change_splits_into_three_sections() {
    let xml = r#"
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
                        <center>
                            <lane id="0" type="driving" level="false"></lane>
                        </center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                                <speed sOffset="0" max="13.89" unit="m/s"/>
                                <speed sOffset="50" max="27.78" unit="m/s"/>
                            </lane>
                        </right>
                    </laneSection>
                    <laneSection s="60">
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

    let drive = OpenDrive::from_xml_str(xml).unwrap();
    let roads = netbuild::netbuild::convert::convert(&drive);
    let config = ImportConfig::default();
    let catalogue = TypeCatalogue::standard();
    let roads = reshape::reshape_all(roads, &config, &catalogue, &CollectingSink::default());
    let road = roads.get("R").unwrap();

    let mut arclengths: Vec<f64> = road.lane_sections.iter().map(|s| s.s).collect();
    arclengths.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    assert_eq!(arclengths, vec![0.0, 50.0, 60.0]);

    let first_section_speed = road.lane_sections[0].right[0].effective_speed;
    assert!((first_section_speed - 13.89).abs() < 1e-6);
    let second_section_speed = road.lane_sections[1].right[0].effective_speed;
    assert!((second_section_speed - 27.78).abs() < 1e-6);
}

#[test]
fn junction_via_inner_connecting_road_emits_one_connection() {
    let xml = r#"
        <?xml version="1.0" standalone="yes"?>
        <OpenDRIVE>
            <header revMajor="1" revMinor="4" name="" version="1.00" date="" north="0" south="0" east="0" west="0"></header>
            <road rule="RHT" name="" length="1.0000000000000000e+01" id="A" junction="-1">
                <link><successor elementType="junction" elementId="J"/></link>
                <planView>
                    <geometry s="0" x="0" y="0" hdg="0" length="10">
                        <line/>
                    </geometry>
                </planView>
                <lanes>
                    <laneSection s="0">
                        <center><lane id="0" type="driving" level="false"></lane></center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                            </lane>
                        </right>
                    </laneSection>
                </lanes>
            </road>
            <road rule="RHT" name="" length="1.0000000000000000e+01" id="X" junction="J">
                <link>
                    <predecessor elementType="road" elementId="A" contactPoint="end"/>
                    <successor elementType="road" elementId="B" contactPoint="start"/>
                </link>
                <planView>
                    <geometry s="0" x="10" y="0" hdg="0" length="10">
                        <line/>
                    </geometry>
                </planView>
                <lanes>
                    <laneSection s="0">
                        <center><lane id="0" type="driving" level="false"></lane></center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                            </lane>
                        </right>
                    </laneSection>
                </lanes>
            </road>
            <road rule="RHT" name="" length="1.0000000000000000e+01" id="B" junction="-1">
                <link><predecessor elementType="junction" elementId="J"/></link>
                <planView>
                    <geometry s="0" x="20" y="0" hdg="0" length="10">
                        <line/>
                    </geometry>
                </planView>
                <lanes>
                    <laneSection s="0">
                        <center><lane id="0" type="driving" level="false"></lane></center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                            </lane>
                        </right>
                    </laneSection>
                </lanes>
            </road>
            <junction name="" id="J">
                <connection id="0" incomingRoad="A" connectingRoad="X" contactPoint="start">
                    <laneLink from="-1" to="-1"/>
                </connection>
            </junction>
        </OpenDRIVE>
    "#;

    let (graph, sink) = run(xml);
    assert_eq!(graph.connections().len(), 1);
    let connection = &graph.connections()[0];
    assert_eq!(connection.from_edge, "-A");
    assert_eq!(connection.to_edge, "-B");
    assert_eq!(connection.orig_id.as_deref(), Some("X"));
    assert!(sink.errors.borrow().is_empty());
}

#[test]
fn narrow_lane_splits_and_downgrades_permissions() {
    let xml = r#"
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
                        <center><lane id="0" type="driving" level="false"></lane></center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                                <width sOffset="20" a="0.5" b="0" c="0" d="0"/>
                                <width sOffset="80" a="3.5" b="0" c="0" d="0"/>
                            </lane>
                        </right>
                    </laneSection>
                </lanes>
            </road>
        </OpenDRIVE>
    "#;

    let drive = OpenDrive::from_xml_str(xml).unwrap();
    let roads = netbuild::netbuild::convert::convert(&drive);
    let config = ImportConfig { min_width: 2.0, ..ImportConfig::default() };
    let catalogue = TypeCatalogue::standard();
    let roads = reshape::reshape_all(roads, &config, &catalogue, &CollectingSink::default());
    let road = roads.get("R").unwrap();

    assert!(road.lane_sections.len() >= 3, "expected splits bracketing the narrow interval");
}

#[test]
fn multi_section_road_stitches_intra_road_continuations() {
    let xml = r#"
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
                        <center><lane id="0" type="driving" level="false"></lane></center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <link><successor id="-1"/></link>
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                            </lane>
                        </right>
                    </laneSection>
                    <laneSection s="50">
                        <center><lane id="0" type="driving" level="false"></lane></center>
                        <right>
                            <lane id="-1" type="driving" level="false">
                                <link><predecessor id="-1"/></link>
                                <width sOffset="0" a="3.5" b="0" c="0" d="0"/>
                            </lane>
                        </right>
                    </laneSection>
                </lanes>
            </road>
        </OpenDRIVE>
    "#;

    let (graph, _sink) = run(xml);

    let forward_first = graph.edge("-R.0").expect("first forward section edge");
    let forward_second = graph.edge("-R.50").expect("second forward section edge");
    assert_eq!(forward_first.lanes.len(), 1);
    assert_eq!(forward_second.lanes.len(), 1);

    let stitched = graph
        .connections()
        .iter()
        .find(|c| c.from_edge == "-R.0" && c.to_edge == "-R.50")
        .expect("intra-road continuation between the two sections");
    assert_eq!(stitched.from_lane, 0);
    assert_eq!(stitched.to_lane, 0);
}

#[test]
fn zero_rate_spiral_warns_and_keeps_other_segments() {
    let xml = r#"
        <?xml version="1.0" standalone="yes"?>
        <OpenDRIVE>
            <header revMajor="1" revMinor="4" name="" version="1.00" date="" north="0" south="0" east="0" west="0"></header>
            <road rule="RHT" name="" length="1.1000000000000000e+02" id="R" junction="-1">
                <planView>
                    <geometry s="0" x="0" y="0" hdg="0" length="10">
                        <spiral curvStart="0" curvEnd="0"/>
                    </geometry>
                    <geometry s="10" x="10" y="0" hdg="0" length="100">
                        <line/>
                    </geometry>
                </planView>
                <lanes>
                    <laneSection s="0">
                        <center><lane id="0" type="driving" level="false"></lane></center>
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

    let (graph, sink) = run(xml);
    assert!(!sink.warnings.borrow().is_empty());
    assert!(graph.edge("-R").is_some());
}
