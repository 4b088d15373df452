use crate::units::Px;

/// Insets between the edge of the bubble and its contents. The header and footer
/// are independent: chat bubbles traditionally leave more room below the text
/// (where the author line spills into) than above it.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Padding {
    pub top: Px,
    pub right: Px,
    pub bottom: Px,
    pub left: Px,
}

impl Padding {
    /// The padding used by the default bubble: `header` above the contents,
    /// `horizontal` at the sides and twice `header` below
    pub fn bubble(header: Px, horizontal: Px) -> Padding {
        Padding {
            top: header,
            right: horizontal,
            bottom: header * 2.0,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> Px {
        self.left + self.right
    }
}
