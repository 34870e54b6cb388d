use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2, pos2};
use image::{Rgba, RgbaImage};

use crate::fonts::FontBook;
use crate::geometry::Affine;
use crate::surface::Surface;

/// A [`Surface`] backed by an RGBA pixel buffer.
///
/// Rasterisation is deterministic: painting the same calls onto a cleared
/// pixmap always yields the same bytes. Strokes are anti-aliased across their
/// width, have butt ends and miter joins that fall back to bevels past
/// [`MITER_LIMIT`].
pub struct PixmapSurface {
    image: RgbaImage,
    current: Affine,
    stack: Vec<Affine>,
    fonts: Arc<FontBook>,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("size", &self.image.dimensions())
            .field("transform", &self.current)
            .field("depth", &self.stack.len())
            .finish()
    }
}

/// Coverage accumulated for a single draw call over a device-space window.
///
/// Overlapping parts of one path combine with `max` so joints are not
/// blended twice.
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    cells: Vec<f32>,
}

impl CoverageMask {
    /// Window covering `bounds` clipped to the image, or `None` if nothing is visible.
    fn new(bounds: Rect, image_size: (u32, u32)) -> Option<Self> {
        if !bounds.is_finite() {
            return None;
        }
        let x0 = bounds.min.x.floor().max(0.0);
        let y0 = bounds.min.y.floor().max(0.0);
        let x1 = bounds.max.x.ceil().min(image_size.0 as f32);
        let y1 = bounds.max.y.ceil().min(image_size.1 as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let width = (x1 - x0) as u32;
        let height = (y1 - y0) as u32;
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            width,
            height,
            cells: vec![0.0; width as usize * height as usize],
        })
    }

    /// Visits every pixel of the window intersecting `bounds`, passing its
    /// centre and the cell to write.
    fn cover(&mut self, bounds: Rect, mut coverage_at: impl FnMut(Pos2) -> f32) {
        let x_start = (bounds.min.x.floor().max(self.x0 as f32) as u32).max(self.x0);
        let y_start = (bounds.min.y.floor().max(self.y0 as f32) as u32).max(self.y0);
        let x_end = (bounds.max.x.ceil().max(0.0) as u32).min(self.x0 + self.width);
        let y_end = (bounds.max.y.ceil().max(0.0) as u32).min(self.y0 + self.height);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let coverage = coverage_at(pos2(x as f32 + 0.5, y as f32 + 0.5));
                if coverage > 0.0 {
                    let cell = &mut self.cells
                        [(y - self.y0) as usize * self.width as usize + (x - self.x0) as usize];
                    *cell = cell.max(coverage.min(1.0));
                }
            }
        }
    }

    fn blend_into(&self, image: &mut RgbaImage, color: Color32) {
        for row in 0..self.height {
            for col in 0..self.width {
                let coverage = self.cells[row as usize * self.width as usize + col as usize];
                if coverage > 0.0 {
                    blend(
                        image.get_pixel_mut(self.x0 + col, self.y0 + row),
                        color,
                        coverage,
                    );
                }
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` onto an unpremultiplied pixel.
fn blend(dst: &mut Rgba<u8>, color: Color32, coverage: f32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let src_alpha = coverage * a as f32 / 255.0;
    if src_alpha <= 0.0 {
        return;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    for (channel, src) in [r, g, b].into_iter().enumerate() {
        let mixed =
            (src as f32 * src_alpha + dst[channel] as f32 * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn bounds_of(points: impl IntoIterator<Item = Pos2>) -> Rect {
    let mut bounds = Rect::NOTHING;
    for point in points {
        bounds.extend_with(point);
    }
    bounds
}

/// Longest miter, as a multiple of the line width, before a join is bevelled.
pub const MITER_LIMIT: f32 = 10.0;

/// Pixel-space coverage of a butt-ended band of half width `half` around `a..b`.
fn band_coverage(p: Pos2, a: Pos2, b: Pos2, half: f32) -> f32 {
    let axis = b - a;
    let len = axis.length();
    let dir = axis / len;
    let rel = p - a;
    let along = rel.dot(dir);
    let across = rel.dot(dir.rot90()).abs();
    let lateral = (half + 0.5 - across).clamp(0.0, 1.0);
    let start = (along + 0.5).clamp(0.0, 1.0);
    let end = (len - along + 0.5).clamp(0.0, 1.0);
    lateral * start.min(end)
}

/// Outer wedge filling the gap between the bands meeting at `joint`: the
/// miter quad, or the bevel triangle once the miter exceeds [`MITER_LIMIT`].
/// `None` for straight runs.
fn join_corner(prev: Pos2, joint: Pos2, next: Pos2, half: f32) -> Option<Vec<Pos2>> {
    let d1 = (joint - prev).normalized();
    let d2 = (next - joint).normalized();
    if !(d1.is_finite() && d2.is_finite()) || (d1.x * d2.y - d1.y * d2.x).abs() < 1e-4 {
        return None;
    }

    // Normals on the outside of the turn.
    let mut n1 = d1.rot90();
    if n1.dot(d2) > 0.0 {
        n1 = -n1;
    }
    let mut n2 = d2.rot90();
    if n2.dot(d1) < 0.0 {
        n2 = -n2;
    }

    let a = joint + n1 * half;
    let b = joint + n2 * half;
    let sum = n1 + n2;
    let sum_sq = sum.length_sq();
    // Miter length over line width is 1 / cos(phi / 2) = 2 / |n1 + n2|.
    if sum_sq <= f32::EPSILON || 2.0 / sum_sq.sqrt() > MITER_LIMIT {
        return Some(vec![joint, a, b]);
    }
    let tip = joint + sum * (2.0 * half / sum_sq);
    Some(vec![joint, a, tip, b])
}

/// Anti-aliased coverage of the convex polygon `corners`, in either winding.
fn convex_coverage(p: Pos2, corners: &[Pos2]) -> f32 {
    let n = corners.len();
    let twice_area: f32 = (0..n)
        .map(|i| {
            let (u, v) = (corners[i], corners[(i + 1) % n]);
            u.x * v.y - v.x * u.y
        })
        .sum();
    if twice_area.abs() <= f32::EPSILON {
        return 0.0;
    }
    let winding = twice_area.signum();

    let mut inside = f32::INFINITY;
    for i in 0..n {
        let (u, v) = (corners[i], corners[(i + 1) % n]);
        let edge = v - u;
        let len = edge.length();
        if len <= f32::EPSILON {
            continue;
        }
        let rel = p - u;
        let distance = winding * (edge.x * rel.y - edge.y * rel.x) / len;
        inside = inside.min(distance);
    }
    (inside + 0.5).clamp(0.0, 1.0)
}

impl PixmapSurface {
    /// A fully transparent pixmap of the given device size.
    pub fn new(width: u32, height: u32, fonts: Arc<FontBook>) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            current: Affine::IDENTITY,
            stack: Vec::new(),
            fonts,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.image.width() && y < self.image.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// True when every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.image.pixels().all(|pixel| pixel[3] == u8::MAX)
    }

    fn image_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> [u32; 2] {
        [self.image.width(), self.image.height()]
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    fn transform(&self) -> Affine {
        self.current
    }

    fn translate(&mut self, offset: Vec2) {
        self.current = self.current * Affine::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.current = self.current * Affine::from_rotation(radians);
    }

    fn scale(&mut self, factor: f32) {
        self.current = self.current * Affine::from_scale(factor);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let t = self.current;
        let quad = [
            t.apply(rect.left_top()),
            t.apply(rect.right_top()),
            t.apply(rect.right_bottom()),
            t.apply(rect.left_bottom()),
        ];
        let bounds = bounds_of(quad);
        let Some(mut mask) = CoverageMask::new(bounds, self.image_size()) else {
            return;
        };

        mask.cover(bounds, |p| {
            let mut sign = 0.0_f32;
            for i in 0..4 {
                let a = quad[i];
                let b = quad[(i + 1) % 4];
                let cross = (b - a).x * (p - a).y - (b - a).y * (p - a).x;
                if cross != 0.0 {
                    if sign == 0.0 {
                        sign = cross.signum();
                    } else if cross.signum() != sign {
                        return 0.0;
                    }
                }
            }
            1.0
        });
        mask.blend_into(&mut self.image, color);
    }

    fn stroke_polyline(&mut self, points: &[Pos2], width: f32, color: Color32) {
        let t = self.current;
        let mut device: Vec<Pos2> = points.iter().map(|&p| t.apply(p)).collect();
        device.dedup();
        let half = width * t.scale_factor() * 0.5;
        if device.len() < 2 || !(half > 0.0) {
            return;
        }

        let corners: Vec<Vec<Pos2>> = device
            .windows(3)
            .filter_map(|w| join_corner(w[0], w[1], w[2], half))
            .collect();

        let pad = Vec2::splat(half + 1.0);
        let all = bounds_of(device.iter().chain(corners.iter().flatten()).copied()).expand2(pad);
        let Some(mut mask) = CoverageMask::new(all, self.image_size()) else {
            return;
        };

        for pair in device.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let bounds = bounds_of([a, b]).expand2(pad);
            mask.cover(bounds, |p| band_coverage(p, a, b, half));
        }
        for corner in &corners {
            let bounds = bounds_of(corner.iter().copied()).expand(1.0);
            mask.cover(bounds, |p| convex_coverage(p, corner));
        }

        mask.blend_into(&mut self.image, color);
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, color: Color32) {
        let t = self.current;
        let scale = t.scale_factor();
        let center = t.apply(center);
        let radius = radius * scale;
        let half = width * scale * 0.5;
        if !(half > 0.0) || radius < 0.0 {
            return;
        }

        let bounds = Rect::from_center_size(center, Vec2::splat(2.0 * (radius + half + 1.0)));
        let Some(mut mask) = CoverageMask::new(bounds, self.image_size()) else {
            return;
        };
        mask.cover(bounds, |p| {
            let ring = ((p - center).length() - radius).abs();
            (half + 0.5 - ring).clamp(0.0, 1.0)
        });
        mask.blend_into(&mut self.image, color);
    }

    fn fill_glyph(&mut self, text: &str, px: f32, color: Color32) {
        let scale = self.current.scale_factor();
        let Some(glyph) = self.fonts.rasterize(text, px * scale) else {
            return;
        };

        // The mask lives in glyph space scaled up to device resolution, so only
        // rotation and translation remain between it and the device.
        let to_device = self.current * Affine::from_scale(1.0 / scale);
        let to_glyph = to_device.inverse();

        let min = pos2(glyph.origin[0] as f32, glyph.origin[1] as f32);
        let max = min + Vec2::new(glyph.width as f32, glyph.height as f32);
        let bounds = bounds_of(
            [min, pos2(max.x, min.y), max, pos2(min.x, max.y)].map(|p| to_device.apply(p)),
        );
        let Some(mut mask) = CoverageMask::new(bounds, self.image_size()) else {
            return;
        };
        mask.cover(bounds, |p| {
            let local = to_glyph.apply(p);
            glyph.sample(local.x, local.y)
        });
        mask.blend_into(&mut self.image, color);
    }
}
