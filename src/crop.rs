//! Aspect-ratio-preserving center-crop.
//!
//! Derives, for every incoming frame, the largest rectangle inside the
//! frame extent that matches the preview surface's aspect ratio, centered
//! along whichever axis has to shrink.

use thiserror::Error;

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// A rectangle of the given size with its origin at (0, 0).
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Rejected crop inputs. Degenerate dimensions are refused outright rather
/// than clamped; the caller decides what to do with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CropError {
    #[error("source rectangle has degenerate dimensions {width}x{height}")]
    DegenerateSource { width: f32, height: f32 },
    #[error("target aspect ratio must be positive and finite, got {0}")]
    InvalidAspect(f32),
}

/// Computes the largest rectangle with aspect ratio `target_aspect` that
/// fits inside `source`, centered on the axis that gets cropped.
///
/// When the source already has the target aspect ratio the source rectangle
/// is returned unchanged.
pub fn center_crop(source: Rect, target_aspect: f32) -> Result<Rect, CropError> {
    if !(source.width > 0.0 && source.width.is_finite())
        || !(source.height > 0.0 && source.height.is_finite())
    {
        return Err(CropError::DegenerateSource {
            width: source.width,
            height: source.height,
        });
    }
    if !(target_aspect > 0.0 && target_aspect.is_finite()) {
        return Err(CropError::InvalidAspect(target_aspect));
    }

    let source_aspect = source.width / source.height;
    if source_aspect == target_aspect {
        return Ok(source);
    }

    Ok(if source_aspect > target_aspect {
        // Source is relatively wider: keep full height, crop width.
        let width = source.height * target_aspect;
        Rect {
            x: source.x + (source.width - width) / 2.0,
            y: source.y,
            width,
            height: source.height,
        }
    } else {
        // Source is relatively taller: keep full width, crop height.
        let height = source.width / target_aspect;
        Rect {
            x: source.x,
            y: source.y + (source.height - height) / 2.0,
            width: source.width,
            height,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn wide_source_keeps_height() {
        let crop = center_crop(Rect::from_size(1920.0, 1080.0), 1.0).unwrap();
        assert_eq!(crop, Rect::new(420.0, 0.0, 1080.0, 1080.0));
    }

    #[test]
    fn tall_source_keeps_width() {
        let crop = center_crop(Rect::from_size(640.0, 480.0), 2.0).unwrap();
        assert_eq!(crop, Rect::new(0.0, 80.0, 640.0, 320.0));
    }

    #[test]
    fn square_source_narrow_target() {
        let crop = center_crop(Rect::from_size(100.0, 100.0), 0.5).unwrap();
        assert_eq!(crop, Rect::new(25.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn matching_aspect_returns_source_exactly() {
        let source = Rect::from_size(1920.0, 1080.0);
        let crop = center_crop(source, 1920.0 / 1080.0).unwrap();
        assert_eq!(crop, source);
    }

    #[test]
    fn offset_origin_is_preserved() {
        let crop = center_crop(Rect::new(10.0, 20.0, 1920.0, 1080.0), 1.0).unwrap();
        assert_eq!(crop, Rect::new(430.0, 20.0, 1080.0, 1080.0));
    }

    #[test]
    fn crop_matches_target_aspect_and_stays_contained() {
        let sizes = [(1920.0, 1080.0), (1080.0, 1920.0), (640.0, 480.0), (13.0, 7.0)];
        let aspects = [0.25, 0.5, 1.0, 16.0 / 9.0, 2.0, 4.0];
        for &(w, h) in &sizes {
            for &aspect in &aspects {
                let source = Rect::from_size(w, h);
                let crop = center_crop(source, aspect).unwrap();
                assert!(
                    (crop.aspect() - aspect).abs() <= EPSILON * aspect,
                    "aspect mismatch for {w}x{h} @ {aspect}: got {}",
                    crop.aspect()
                );
                assert!(crop.x >= source.x - EPSILON);
                assert!(crop.y >= source.y - EPSILON);
                assert!(crop.x + crop.width <= source.x + source.width + EPSILON);
                assert!(crop.y + crop.height <= source.y + source.height + EPSILON);
            }
        }
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let source = Rect::from_size(640.0, 480.0);
        assert!(matches!(
            center_crop(Rect::from_size(640.0, 0.0), 1.0),
            Err(CropError::DegenerateSource { .. })
        ));
        assert!(matches!(
            center_crop(Rect::from_size(0.0, 480.0), 1.0),
            Err(CropError::DegenerateSource { .. })
        ));
        assert!(matches!(
            center_crop(Rect::from_size(-640.0, 480.0), 1.0),
            Err(CropError::DegenerateSource { .. })
        ));
        assert!(matches!(
            center_crop(Rect::from_size(f32::NAN, 480.0), 1.0),
            Err(CropError::DegenerateSource { .. })
        ));
        assert_eq!(center_crop(source, 0.0), Err(CropError::InvalidAspect(0.0)));
        assert_eq!(center_crop(source, -1.5), Err(CropError::InvalidAspect(-1.5)));
        assert!(matches!(
            center_crop(source, f32::INFINITY),
            Err(CropError::InvalidAspect(_))
        ));
    }
}
