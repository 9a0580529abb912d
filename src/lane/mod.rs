use crate::core::additional_data::AdditionalData;
use crate::lane::speed::Speed;
use crate::lane::width::Width;
use lane_link::LaneLink;
use lane_type::LaneType;
use std::borrow::Cow;

pub mod center;
pub mod center_lane;
pub mod lane_link;
pub mod lane_section;
pub mod lane_type;
pub mod lanes;
pub mod left;
pub mod left_lane;
pub mod offset;
pub mod predecessor_successor;
pub mod right;
pub mod right_lane;
pub mod speed;
pub mod width;

/// Lane elements are included in left/center/right elements. Lane elements should represent the
/// lanes from left to right, that is, with descending ID.
///
/// Only the subset of ASAM OpenDRIVE lane attributes that feed the width/speed reshaping and
/// edge-emission steps is kept here; road marks, access rules, materials and similar cosmetic
/// attributes are ignored like any other unknown tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub link: Option<LaneLink>,
    pub width: Vec<Width>,
    pub speed: Vec<Speed>,
    /// - `true` = keep lane on level, that is, do not apply superelevation;
    /// - `false` = apply superelevation to this lane (default, also used if attribute level is missing)
    pub level: Option<bool>,
    /// Type of the lane
    pub r#type: LaneType,
    pub additional_data: AdditionalData,
}

impl Lane {
    pub fn visit_attributes(
        &self,
        visitor: impl for<'b> FnOnce(
            Cow<'b, [xml::attribute::Attribute<'b>]>,
        ) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        visit_attributes_flatten!(
            visitor,
            "level" => self.level.map(|v| v.to_string()).as_deref(),
            "type" => Some(self.r#type.as_str()),
        )
    }

    pub fn visit_children(
        &self,
        mut visitor: impl FnMut(xml::writer::XmlEvent) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        if let Some(link) = &self.link {
            visit_children!(visitor, "link" => link);
        }

        for width in &self.width {
            visit_children!(visitor, "width" => width);
        }

        for speed in &self.speed {
            visit_children!(visitor, "speed" => speed);
        }

        self.additional_data.append_children(visitor)
    }
}

impl<'a, I> TryFrom<crate::parser::ReadContext<'a, I>> for Lane
where
    I: Iterator<Item = xml::reader::Result<xml::reader::XmlEvent>>,
{
    type Error = Box<crate::parser::Error>;

    fn try_from(mut read: crate::parser::ReadContext<'a, I>) -> Result<Self, Self::Error> {
        let mut link = None;
        let mut width = Vec::new();
        let mut speed = Vec::new();
        let mut additional_data = AdditionalData::default();

        match_child_eq_ignore_ascii_case!(
            read,
            "link" => LaneLink => |v| link = Some(v),
            "width" => Width => |v| width.push(v),
            "speed" => Speed => |v| speed.push(v),
            _ => |_name, context| additional_data.fill(context),
        );

        Ok(Self {
            link,
            width,
            speed,
            level: read.attribute_opt("level")?,
            r#type: read.attribute("type")?,
            additional_data,
        })
    }
}

#[cfg(feature = "fuzzing")]
impl arbitrary::Arbitrary<'_> for Lane {
    fn arbitrary(u: &mut arbitrary::Unstructured) -> arbitrary::Result<Self> {
        Ok(Self {
            link: u.arbitrary()?,
            width: u.arbitrary()?,
            speed: u.arbitrary()?,
            level: u.arbitrary()?,
            r#type: u.arbitrary()?,
            additional_data: u.arbitrary()?,
        })
    }
}
