use crate::road::signals::signal::Signal;
use std::borrow::Cow;

pub mod orientation;
pub mod signal;

pub use orientation::Orientation;

/// The `<signals>` element is the container for all signals along a road. Only the signal type,
/// subtype and position are kept; validity ranges, controller dependencies and explicit 3D
/// positioning are dropped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct Signals {
    pub signal: Vec<Signal>,
}

impl Signals {
    pub fn visit_attributes(
        &self,
        visitor: impl for<'b> FnOnce(
            Cow<'b, [xml::attribute::Attribute<'b>]>,
        ) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        visit_attributes!(visitor)
    }

    pub fn visit_children(
        &self,
        mut visitor: impl FnMut(xml::writer::XmlEvent) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        for signal in &self.signal {
            visit_children!(visitor, "signal" => signal);
        }

        Ok(())
    }
}

impl<'a, I> TryFrom<crate::parser::ReadContext<'a, I>> for Signals
where
    I: Iterator<Item = xml::reader::Result<xml::reader::XmlEvent>>,
{
    type Error = crate::parser::Error;

    fn try_from(mut read: crate::parser::ReadContext<'a, I>) -> Result<Self, Self::Error> {
        let mut signal = Vec::new();

        match_child_eq_ignore_ascii_case!(
            read,
            "signal" => Signal => |v| signal.push(v),
        );

        Ok(Self { signal })
    }
}
