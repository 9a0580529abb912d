use crate::junction::connection::Connection;
use std::borrow::Cow;
use vec1::Vec1;

pub mod connection;
pub mod connection_type;
pub mod contact_point;
pub mod element_dir;
pub mod junction_type;
pub mod lane_link;
pub mod predecessor_successor;

pub use connection_type::ConnectionType;
pub use contact_point::ContactPoint;
pub use element_dir::ElementDir;
pub use junction_type::JunctionType;

/// A `<junction>` element groups the connecting roads that link a set of incoming roads. Only the
/// id and the connections are kept; priority, controller, surface and virtual-junction geometry
/// are not needed to flatten lane connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Unique ID within database
    pub id: String,
    pub connection: Vec1<Connection>,
}

impl Junction {
    pub fn visit_attributes(
        &self,
        visitor: impl for<'b> FnOnce(
            Cow<'b, [xml::attribute::Attribute<'b>]>,
        ) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        visit_attributes!(visitor, "id" => &self.id)
    }

    pub fn visit_children(
        &self,
        mut visitor: impl FnMut(xml::writer::XmlEvent) -> xml::writer::Result<()>,
    ) -> xml::writer::Result<()> {
        for connection in &self.connection {
            visit_children!(visitor, "connection" => connection);
        }

        Ok(())
    }
}

impl<'a, I> TryFrom<crate::parser::ReadContext<'a, I>> for Junction
where
    I: Iterator<Item = xml::reader::Result<xml::reader::XmlEvent>>,
{
    type Error = Box<crate::parser::Error>;

    fn try_from(mut read: crate::parser::ReadContext<'a, I>) -> Result<Self, Self::Error> {
        let mut connection = Vec::new();

        match_child_eq_ignore_ascii_case!(
            read,
            "connection" true => Connection => |v| connection.push(v),
        );

        Ok(Self {
            id: read.attribute("id")?,
            connection: Vec1::try_from_vec(connection).unwrap(),
        })
    }
}

#[cfg(feature = "fuzzing")]
impl arbitrary::Arbitrary<'_> for Junction {
    fn arbitrary(u: &mut arbitrary::Unstructured) -> arbitrary::Result<Self> {
        Ok(Self {
            id: u.arbitrary()?,
            connection: {
                let mut vec1 = Vec1::new(u.arbitrary()?);
                vec1.extend(u.arbitrary::<Vec<_>>()?);
                vec1
            },
        })
    }
}
