//! Scale arithmetic for fit-to-container zoom modes

use std::str::FromStr;

use super::types::PageSize;

/// Margin subtracted from the container before fitting a page into it
const CONTAINER_MARGIN: f32 = 5.0;

/// Requested document scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleRequest {
    /// 100%
    Actual,
    /// Fit page width into the container
    PageWidth,
    /// Fit page height into the container
    PageHeight,
    /// Fit the whole page into the container
    PageFit,
    /// Width fit for portrait pages, whole-page fit for landscape ones,
    /// capped by the maximum auto zoom
    Auto,
    Value(f32),
}

impl FromStr for ScaleRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "actual" => Ok(Self::Actual),
            "width" => Ok(Self::PageWidth),
            "height" => Ok(Self::PageHeight),
            "fit" => Ok(Self::PageFit),
            "auto" => Ok(Self::Auto),
            other => other
                .parse::<f32>()
                .map(Self::Value)
                .map_err(|_| format!("unknown scale '{s}'")),
        }
    }
}

/// Container dimensions in the same units as [`PageSize`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

/// Scale bounds and steps
#[derive(Clone, Copy, Debug)]
pub struct Zoom {
    pub step: f32,
    pub max_auto: f32,
}

impl Zoom {
    /// Minimum allowed scale
    pub const MIN_SCALE: f32 = 0.1;

    /// Turn a request into a concrete scale.
    ///
    /// Fit modes need both a container and the size of the last rendered
    /// page at `current` scale; without them only `Actual` and explicit values
    /// change the scale and the fit modes keep `current`.
    #[must_use]
    pub fn resolve(
        &self,
        request: ScaleRequest,
        current: f32,
        last_page: Option<PageSize>,
        container: Option<ContainerSize>,
    ) -> f32 {
        let fit = match (last_page, container) {
            (Some(page), Some(container)) if page.width > 0.0 && page.height > 0.0 => {
                let width_scale = (container.width - CONTAINER_MARGIN) / page.width * current;
                let height_scale = (container.height - CONTAINER_MARGIN) / page.height * current;
                Some((page, width_scale, height_scale))
            }
            _ => None,
        };

        let scale = match (request, fit) {
            (ScaleRequest::Actual, _) => 1.0,
            (ScaleRequest::Value(value), _) => value,
            (ScaleRequest::PageWidth, Some((_, width, _))) => width,
            (ScaleRequest::PageHeight, Some((_, _, height))) => height,
            (ScaleRequest::PageFit, Some((_, width, height))) => width.min(height),
            (ScaleRequest::Auto, Some((page, width, height))) => {
                let horizontal = if page.is_landscape() {
                    width.min(height)
                } else {
                    width
                };
                horizontal.min(self.max_auto)
            }
            (_, None) => current,
        };

        Self::clamp_scale(scale)
    }

    /// Zoom in by one step
    #[must_use]
    pub fn step_in(&self, current: f32) -> f32 {
        Self::clamp_scale(current + self.step)
    }

    /// Zoom out by one step
    #[must_use]
    pub fn step_out(&self, current: f32) -> f32 {
        Self::clamp_scale(current - self.step)
    }

    /// Clamp to valid range, handling NaN/Inf
    #[must_use]
    pub fn clamp_scale(scale: f32) -> f32 {
        if !scale.is_finite() {
            1.0
        } else {
            scale.max(Self::MIN_SCALE)
        }
    }
}
