/// - "+" = valid in positive s-direction
/// - "-" = valid in negative s-direction
/// - "none" = valid in both directions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub enum Orientation {
    Plus,
    Minus,
    None,
}

impl_from_str_as_str!(
    Orientation,
    "+" => Plus,
    "-" => Minus,
    "none" => None,
);
