//! Annotated match rendering

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

use crate::config::MarkerStyle;
use crate::matching::Point;

/// Which marker style to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Caller-supplied assist point
    Assist,
    /// Chosen coordinate
    Result,
}

/// A circle drawn on the reference image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub point: Point,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn assist(point: Point) -> Self {
        Self {
            point,
            kind: MarkerKind::Assist,
        }
    }

    pub fn result(point: Point) -> Self {
        Self {
            point,
            kind: MarkerKind::Result,
        }
    }
}

/// An accepted correspondence, in each image's own coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchLine {
    /// Keypoint in the reference image
    pub from: (f32, f32),
    /// Keypoint in the template image
    pub to: (f32, f32),
}

/// Draws accepted correspondences and markers into one image
pub trait MatchRenderer: Send + Sync {
    fn draw_annotated(
        &self,
        reference: &RgbImage,
        template: &RgbImage,
        matches: &[MatchLine],
        markers: &[Marker],
    ) -> RgbImage;
}

/// Puts the reference on the left, the template on the right and joins
/// matched keypoints with coloured lines
#[derive(Debug, Clone, Default)]
pub struct SideBySideRenderer {
    style: MarkerStyle,
}

// Cycled per match line so neighbouring lines stay distinguishable
const LINE_PALETTE: [[u8; 3]; 6] = [
    [0, 200, 0],
    [0, 128, 255],
    [255, 0, 255],
    [0, 255, 255],
    [255, 128, 0],
    [128, 0, 255],
];

const KEYPOINT_RADIUS: i32 = 3;

impl SideBySideRenderer {
    pub fn new(style: MarkerStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Ring of `thickness` pixels centred on `radius`
    fn draw_marker(&self, canvas: &mut RgbImage, marker: &Marker) {
        let color = match marker.kind {
            MarkerKind::Assist => Rgb(self.style.assist_color),
            MarkerKind::Result => Rgb(self.style.result_color),
        };
        let center = (marker.point.x as i32, marker.point.y as i32);
        let half = (self.style.thickness / 2) as i32;
        let radius = self.style.radius as i32;

        for r in (radius - half).max(0)..=(radius + half) {
            draw_hollow_circle_mut(canvas, center, r, color);
        }
        if radius - half <= 0 {
            draw_pixel_checked(canvas, center, color);
        }
    }
}

fn draw_pixel_checked(canvas: &mut RgbImage, (x, y): (i32, i32), color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

impl MatchRenderer for SideBySideRenderer {
    fn draw_annotated(
        &self,
        reference: &RgbImage,
        template: &RgbImage,
        matches: &[MatchLine],
        markers: &[Marker],
    ) -> RgbImage {
        let offset = reference.width();
        let width = reference.width() + template.width();
        let height = reference.height().max(template.height());

        let mut canvas = RgbImage::new(width, height);
        imageops::replace(&mut canvas, reference, 0, 0);
        imageops::replace(&mut canvas, template, offset as i64, 0);

        for (i, line) in matches.iter().enumerate() {
            let color = Rgb(LINE_PALETTE[i % LINE_PALETTE.len()]);
            let end = (line.to.0 + offset as f32, line.to.1);

            draw_line_segment_mut(&mut canvas, line.from, end, color);
            draw_hollow_circle_mut(
                &mut canvas,
                (line.from.0 as i32, line.from.1 as i32),
                KEYPOINT_RADIUS,
                color,
            );
            draw_hollow_circle_mut(&mut canvas, (end.0 as i32, end.1 as i32), KEYPOINT_RADIUS, color);
        }

        for marker in markers {
            self.draw_marker(&mut canvas, marker);
        }

        canvas
    }
}
