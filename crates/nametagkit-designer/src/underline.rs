use crate::layout::TextLayout;
use crate::model::Outline;

/// Rectangle centred under a text layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Underline {
    pub width: f64,
    pub thickness: f64,
    /// Distance from the baseline down to the underline's top edge
    pub gap: f64,
}

impl Underline {
    pub fn for_layout(layout: &TextLayout, width_factor: f64, thickness: f64, gap: f64) -> Self {
        Self {
            width: layout.total_width * width_factor,
            thickness,
            gap,
        }
    }

    pub fn outline(&self) -> Outline {
        Outline::rectangle(
            -self.width / 2.0,
            -(self.gap + self.thickness),
            self.width,
            self.thickness,
        )
    }
}
