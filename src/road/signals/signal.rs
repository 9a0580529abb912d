use crate::road::signals::Orientation;
use std::borrow::Cow;
use uom::si::f64::Length;
use uom::si::length::meter;

/// Used to provide information about signals along a road. Only the attributes needed to resolve
/// right-of-way at a junction (type, subtype, position) are kept; dynamic dependencies, explicit
/// 3D positioning and lane validity ranges are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Unique ID of the signal within the OpenDRIVE file
    pub id: String,
    /// s-coordinate
    pub s: Length,
    /// t-coordinate
    pub t: Length,
    /// - "+" = valid in positive s- direction
    /// - "-" = valid in negative s- direction
    /// - "none" = valid in both directions
    pub orientation: Orientation,
    /// Type identifier according to country code or "-1" / "none". See extra document.
    pub r#type: String,
    /// Subtype identifier according to country code or "-1" / "none"
    pub subtype: String,
}

impl Signal {
    pub fn visit_attributes(
        &self,
        visitor: impl for<'b> FnOnce(
            Cow<'b, [xml::attribute::Attribute<'b>]>,
        ) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        visit_attributes!(
            visitor,
            "id" => &self.id,
            "s" => &self.s.value.to_scientific_string(),
            "t" => &self.t.value.to_scientific_string(),
            "orientation" => self.orientation.as_str(),
            "type" => &self.r#type,
            "subtype" => &self.subtype,
        )
    }

    pub fn visit_children(
        &self,
        mut visitor: impl FnMut(xml::writer::XmlEvent) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        visit_children!(visitor);
        Ok(())
    }
}

impl<'a, I> TryFrom<crate::parser::ReadContext<'a, I>> for Signal
where
    I: Iterator<Item = xml::reader::Result<xml::reader::XmlEvent>>,
{
    type Error = crate::parser::Error;

    fn try_from(mut read: crate::parser::ReadContext<'a, I>) -> Result<Self, Self::Error> {
        read.expecting_no_child_elements_for(Self {
            id: read.attribute("id")?,
            s: read.attribute("s").map(Length::new::<meter>)?,
            t: read.attribute("t").map(Length::new::<meter>)?,
            orientation: read.attribute("orientation")?,
            r#type: read.attribute("type")?,
            subtype: read.attribute("subtype")?,
        })
    }
}

#[cfg(feature = "fuzzing")]
impl arbitrary::Arbitrary<'_> for Signal {
    fn arbitrary(u: &mut arbitrary::Unstructured) -> arbitrary::Result<Self> {
        use crate::fuzzing::NotNan;
        Ok(Self {
            id: u.arbitrary()?,
            s: Length::new::<meter>(u.not_nan_f64()?),
            t: Length::new::<meter>(u.not_nan_f64()?),
            orientation: u.arbitrary()?,
            r#type: u.arbitrary()?,
            subtype: u.arbitrary()?,
        })
    }
}
