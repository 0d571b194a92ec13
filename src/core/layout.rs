/// How the surface is scaled into the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Integer multiple of the surface; painted with nearest sampling.
    Magnified { scale: u32 },
    /// Surface halved `halvings` times; painted with linear sampling.
    Shrunk { halvings: u32 },
}

impl Fit {
    /// Display pixels per surface pixel.
    pub fn scale(&self) -> f32 {
        match *self {
            Fit::Magnified { scale } => scale as f32,
            Fit::Shrunk { halvings } => 0.5f32.powi(halvings as i32),
        }
    }

    /// True when every surface pixel covers a whole block of display pixels.
    pub fn is_pixelated(&self) -> bool {
        matches!(self, Fit::Magnified { .. })
    }
}

/// Area of the viewport the surface is painted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Result of fitting a surface into a viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub fit: Fit,
    pub rect: DisplayRect,
    pub viewport: (u32, u32),
}

impl Layout {
    /// Fit a `surface` into `viewport`, both in pixels.
    ///
    /// The constraining dimension is the one where the viewport is relatively
    /// tighter. A surface larger than the viewport in that dimension is halved
    /// until it fits; otherwise it is magnified by the largest integer factor
    /// that still fits. Returns `None` when either size has a zero extent.
    pub fn compute(surface: (u32, u32), viewport: (u32, u32)) -> Option<Self> {
        let (sw, sh) = surface;
        let (vw, vh) = viewport;
        if sw == 0 || sh == 0 || vw == 0 || vh == 0 {
            return None;
        }

        let height_bound = u64::from(vw) * u64::from(sh) >= u64::from(vh) * u64::from(sw);
        let (extent, limit) = if height_bound { (sh, vh) } else { (sw, vw) };

        let (fit, width, height) = if extent > limit {
            let mut halvings = 0u32;
            let mut shrunk = f64::from(extent);
            while shrunk > f64::from(limit) {
                shrunk /= 2.0;
                halvings += 1;
            }
            let factor = 0.5f64.powi(halvings as i32);
            (
                Fit::Shrunk { halvings },
                f64::from(sw) * factor,
                f64::from(sh) * factor,
            )
        } else {
            let scale = limit / extent;
            (
                Fit::Magnified { scale },
                f64::from(sw) * f64::from(scale),
                f64::from(sh) * f64::from(scale),
            )
        };

        let width = (width.floor() as u32).clamp(1, vw);
        let height = (height.floor() as u32).clamp(1, vh);

        Some(Self {
            fit,
            rect: DisplayRect {
                x: (vw - width) / 2,
                y: (vh - height) / 2,
                width,
                height,
            },
            viewport,
        })
    }

    pub fn scale(&self) -> f32 {
        self.fit.scale()
    }

    /// Translate a viewport position into display-rectangle coordinates.
    pub fn to_local(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (x - f64::from(self.rect.x)) as f32,
            (y - f64::from(self.rect.y)) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_hd_square_surface() {
        let layout = Layout::compute((128, 128), (1920, 1080)).unwrap();

        assert_eq!(layout.fit, Fit::Magnified { scale: 8 });
        assert_eq!((layout.rect.width, layout.rect.height), (1024, 1024));
        assert_eq!((layout.rect.x, layout.rect.y), (448, 28));
        assert_eq!(layout.scale(), 8.0);
    }

    #[test]
    fn test_wide_surface_in_small_viewport() {
        let layout = Layout::compute((192, 108), (100, 100)).unwrap();

        assert_eq!(layout.fit, Fit::Shrunk { halvings: 1 });
        assert_eq!((layout.rect.width, layout.rect.height), (96, 54));
        assert_eq!(layout.scale(), 0.5);
        assert!(!layout.fit.is_pixelated());
    }

    #[test]
    fn test_exact_fit_is_scale_one() {
        let layout = Layout::compute((640, 480), (640, 480)).unwrap();
        assert_eq!(layout.fit, Fit::Magnified { scale: 1 });
        assert_eq!(layout.rect, DisplayRect { x: 0, y: 0, width: 640, height: 480 });
    }

    #[test]
    fn test_fractional_halving_floors() {
        // 27 -> 13.5 still exceeds 13, so a second halving happens
        let layout = Layout::compute((54, 27), (1000, 13)).unwrap();
        assert_eq!(layout.fit, Fit::Shrunk { halvings: 2 });
        assert_eq!((layout.rect.width, layout.rect.height), (13, 6));
    }

    #[test]
    fn test_zero_viewport_has_no_layout() {
        assert_eq!(Layout::compute((128, 128), (0, 600)), None);
        assert_eq!(Layout::compute((128, 128), (800, 0)), None);
        assert_eq!(Layout::compute((0, 128), (800, 600)), None);
    }

    #[test]
    fn test_tiny_viewport_keeps_one_pixel() {
        let layout = Layout::compute((512, 512), (1, 1)).unwrap();
        assert_eq!((layout.rect.width, layout.rect.height), (1, 1));
    }

    #[test]
    fn test_to_local_offsets_by_rect_origin() {
        let layout = Layout::compute((128, 128), (1920, 1080)).unwrap();
        assert_eq!(layout.to_local(448.0, 28.0), (0.0, 0.0));
        assert_eq!(layout.to_local(458.5, 20.0), (10.5, -8.0));
    }

    #[test]
    fn test_magnified_sizes_are_exact_multiples() {
        let surfaces = [(128, 128), (192, 108), (320, 200), (64, 256)];
        for &(sw, sh) in &surfaces {
            for vw in (sw..sw * 9).step_by(37) {
                for vh in (sh..sh * 9).step_by(41) {
                    let layout = Layout::compute((sw, sh), (vw, vh)).unwrap();
                    if let Fit::Magnified { scale } = layout.fit {
                        assert!(scale >= 1);
                        assert_eq!(layout.rect.width, sw * scale);
                        assert_eq!(layout.rect.height, sh * scale);
                        assert!(layout.rect.width <= vw && layout.rect.height <= vh);
                    }
                }
            }
        }
    }

    #[test]
    fn test_shrunk_fits_constraining_dimension() {
        let surfaces = [(512, 512), (1920, 1080), (300, 1000)];
        for &(sw, sh) in &surfaces {
            for vw in (1..sw).step_by(29) {
                for vh in (1..sh).step_by(31) {
                    let layout = Layout::compute((sw, sh), (vw, vh)).unwrap();
                    assert!(matches!(layout.fit, Fit::Shrunk { .. }));
                    assert!(layout.rect.width <= vw);
                    assert!(layout.rect.height <= vh);
                    assert!(layout.rect.x + layout.rect.width <= vw);
                    assert!(layout.rect.y + layout.rect.height <= vh);
                }
            }
        }
    }
}
