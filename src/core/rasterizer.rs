use crate::core::color::to_output;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::interpolation::{
    barycentric_coordinates, interpolate_depth, interpolate_w, perspective_correct_barycentric,
};
use crate::core::math::transform::{W_EPSILON, ndc_to_screen};
use crate::core::pipeline::{FragmentShader, blend};
use nalgebra::{Point2, Vector3, Vector4};

/// Extra pixels added on the max side of every bounding box so neighbouring
/// triangles never leave a seam between their boxes.
pub const BOUNDING_BOX_PADDING: i32 = 5;

/// What happened to a triangle handed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// At least one vertex was outside the view frustum; nothing was drawn.
    Culled,
    /// The triangle was scanned; `fragments` passed the depth test and were shaded.
    Rasterized { fragments: usize },
}

/// The Rasterizer turns transformed triangles into shaded pixels on the FrameBuffer.
///
/// Triangles are not clipped: a triangle with any vertex outside
/// NDC [-1,1] x [-1,1] x [0,1] is discarded whole. Front faces are wound
/// clockwise as seen by the camera; the edge test rejects the other winding.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Frustum test for a single transformed vertex.
    ///
    /// A vertex whose clip-space w is not positive has no valid NDC position and
    /// counts as outside.
    #[inline]
    pub fn is_outside_frustum(vertex: &VertexOut) -> bool {
        let p = &vertex.position;
        p.w <= W_EPSILON
            || !(-1.0..=1.0).contains(&p.x)
            || !(-1.0..=1.0).contains(&p.y)
            || !(0.0..=1.0).contains(&p.z)
    }

    /// Rasterize a single triangle given its three transformed (NDC) vertices.
    ///
    /// Steps: frustum cull, NDC -> screen mapping, padded bounding box, edge test
    /// per pixel center, depth test on the interpolated depth, perspective-correct
    /// attribute interpolation, pixel shading, `max_to_one` and 8-bit write.
    pub fn rasterize_triangle<S: FragmentShader + ?Sized>(
        &self,
        framebuffer: &mut FrameBuffer,
        vertices: [&VertexOut; 3],
        shader: &S,
    ) -> TriangleOutcome {
        // 1. Frustum Culling (whole triangle)
        if vertices.iter().any(|v| Self::is_outside_frustum(v)) {
            return TriangleOutcome::Culled;
        }

        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;

        // 2. Viewport Transform (z and w pass through)
        let mut screen = [VertexOut::default(); 3];
        let mut screen_coords = [Point2::origin(); 3];
        for i in 0..3 {
            let p = vertices[i].position;
            let s = ndc_to_screen(p.x, p.y, width, height);
            screen_coords[i] = s;
            screen[i] = VertexOut {
                position: Vector4::new(s.x, s.y, p.z, p.w),
                ..*vertices[i]
            };
        }

        // 3. Compute Bounding Box
        let (min_x, min_y, max_x, max_y) =
            Self::compute_bounding_box(&screen_coords, framebuffer.width, framebuffer.height);

        let screen_refs = [&screen[0], &screen[1], &screen[2]];
        let mut fragments = 0;

        // 4. Pixel Loop
        for y in min_y..max_y {
            for x in min_x..max_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                // 5. Edge test + barycentric weights
                let Some(bary) = barycentric_coordinates(
                    pixel_center,
                    screen_coords[0],
                    screen_coords[1],
                    screen_coords[2],
                ) else {
                    continue;
                };

                // 6. Depth Test
                let depth = interpolate_depth(
                    bary,
                    [screen[0].position.z, screen[1].position.z, screen[2].position.z],
                );
                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                // 7. Perspective-correct interpolation
                let Some(fragment) = interpolate_fragment(screen_refs, bary, pixel_center) else {
                    continue;
                };

                // 8. Pixel Shading
                let color = shader.shade(&fragment);
                framebuffer.set_pixel(x, y, to_output(color));
                fragments += 1;
            }
        }

        TriangleOutcome::Rasterized { fragments }
    }

    /// Bounding box in whole pixels, clamped to the framebuffer.
    /// The max corner is exclusive and padded by `BOUNDING_BOX_PADDING`.
    fn compute_bounding_box(
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> (usize, usize, usize, usize) {
        let clamp_x = |v: i32| v.clamp(0, width as i32) as usize;
        let clamp_y = |v: i32| v.clamp(0, height as i32) as usize;

        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
        let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
        let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;

        (
            clamp_x(min_x),
            clamp_y(min_y),
            clamp_x(max_x + BOUNDING_BOX_PADDING),
            clamp_y(max_y + BOUNDING_BOX_PADDING),
        )
    }
}

/// Builds the fragment for screen-space barycentric weights `bary`.
///
/// Attributes are interpolated perspective-correctly (each weighted by `1 / w`
/// of its vertex, then renormalized by the interpolated `1 / w`); normal, tangent
/// and view direction are renormalized afterwards. The fragment's position is
/// `(pixel.x, pixel.y, interpolated depth, interpolated w)`.
///
/// `vertices` must already be in screen space (z = NDC depth, w = clip w).
/// Returns `None` if any vertex has a non-positive w.
pub fn interpolate_fragment(
    vertices: [&VertexOut; 3],
    bary: Vector3<f32>,
    pixel: Point2<f32>,
) -> Option<VertexOut> {
    let w = [
        vertices[0].position.w,
        vertices[1].position.w,
        vertices[2].position.w,
    ];
    let corrected = perspective_correct_barycentric(bary, w[0], w[1], w[2])?;

    let mut fragment = blend(vertices, corrected);
    fragment.normal = renormalize(fragment.normal);
    fragment.tangent = renormalize(fragment.tangent);
    fragment.view_direction = renormalize(fragment.view_direction);

    let depth = interpolate_depth(
        bary,
        [
            vertices[0].position.z,
            vertices[1].position.z,
            vertices[2].position.z,
        ],
    );
    fragment.position = Vector4::new(pixel.x, pixel.y, depth, interpolate_w(bary, w));

    Some(fragment)
}

#[inline]
fn renormalize(v: Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(1e-8).unwrap_or(v)
}
