//! Page setup handed to the paginator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    Letter,
    Legal,
    A4,
}

impl PageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PageFormat::Letter => "Letter",
            PageFormat::Legal => "Legal",
            PageFormat::A4 => "A4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn name(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Pagination settings.
///
/// Defaults: half-inch margins on all sides, 2x raster scale for embedded
/// images at 0.98 JPEG quality, Letter, Portrait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    /// Top, right, bottom, left, in inches.
    pub margins_in: [f32; 4],
    /// Raster scale for embedded imagery.
    pub image_scale: u32,
    /// JPEG quality for rasterised imagery (0.0 – 1.0).
    pub image_quality: f32,
    pub format: PageFormat,
    pub orientation: Orientation,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            margins_in: [0.5; 4],
            image_scale: 2,
            image_quality: 0.98,
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
        }
    }
}

impl PageSetup {
    /// CSS-pixel DPI (96) multiplied by the raster scale.
    pub fn image_dpi(&self) -> u32 {
        self.image_scale.max(1).saturating_mul(96)
    }

    /// Image quality as a 0 – 100 percentage.
    pub fn image_quality_percent(&self) -> u32 {
        (self.image_quality.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}
