#[macro_use]
pub mod parser;
pub mod writer;

pub mod core;
pub mod junction;
pub mod lane;
pub mod netbuild;
pub mod road;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;

#[cfg(test)]
mod tests {
    use crate::core::OpenDrive;

    #[test]
    pub fn test_xml() {
        let source = r#"
                <?xml version="1.0" standalone="yes"?>
                <OpenDRIVE> 
                    <header revMajor="1" revMinor="7" name="" version="1.00" date="Tue Feb 25 13:02:27 2020" north="0.0000000000000000e+00" south="0.0000000000000000e+00" east="0.0000000000000000e+00" west="0.0000000000000000e+00">
                    </header>
                </OpenDRIVE>
            "#;
        let _ = OpenDrive::from_xml_str(source).unwrap();
    }

    #[test]
    pub fn test_xml_events_center_lane() {
        let source = r#"
                <?xml version="1.0" standalone="yes"?>
                <OpenDRIVE>
                    <header revMajor="1" revMinor="7" name="" version="1.00" date="Tue Feb 25 13:02:27 2020" north="0.0000000000000000e+00" south="0.0000000000000000e+00" east="0.0000000000000000e+00" west="0.0000000000000000e+00">
                    </header>
                    <road rule="RHT" name="" length="1.0000000000000000e+02" id="1" junction="-1">
                        <link>
                        </link>
                        <planView>
                            <geometry s="0.0000000000000000e+00" x="0.0000000000000000e+00" y="0.0000000000000000e+00" hdg="0.0000000000000000e+00" length="1.0000000000000000e+02">
                                <line/>
                            </geometry>
                        </planView>
                        <lanes>
                            <laneSection s="0.0000000000000000e+00">
                                <center>
                                    <lane id="0" type="driving" level="false">
                                    </lane>
                                </center>
                            </laneSection>
                        </lanes>
                    </road>
                </OpenDRIVE>
            "#;
        let _ = OpenDrive::from_xml_str(source).unwrap();
    }
}
