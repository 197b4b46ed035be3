//! Reflectance functions shared by the rasterizer's pixel shader and the ray
//! tracer's materials.
//!
//! Direction conventions: `l` points from the surface towards the light, `v` is
//! the viewing ray direction (from the eye towards the surface) and `n` is the
//! unit surface normal.

use nalgebra::Vector3;
use std::f32::consts::PI;

/// Lambert diffuse: `(cd * kd) / PI`.
pub fn lambert(kd: f32, cd: Vector3<f32>) -> Vector3<f32> {
    cd * kd / PI
}

/// Lambert diffuse with a per-channel reflectance.
pub fn lambert_rgb(kd: Vector3<f32>, cd: Vector3<f32>) -> Vector3<f32> {
    cd.component_mul(&kd) / PI
}

/// Phong specular lobe, replicated over the three channels.
///
/// `l` is reflected about `n`; the lobe is `ks * max(0, dot(reflect, v))^exp`.
pub fn phong(ks: f32, exp: f32, l: &Vector3<f32>, v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    let reflect = (l - n * (2.0 * n.dot(l))).normalize();
    let cos_angle = reflect.dot(v).max(0.0);
    Vector3::repeat(ks * cos_angle.powf(exp))
}

/// Schlick's Fresnel approximation.
///
/// `h` is the normalized half vector, `v` the normalized direction towards the
/// eye and `f0` the base reflectivity (0.04 for dielectrics, albedo for metals).
pub fn fresnel_schlick(h: &Vector3<f32>, v: &Vector3<f32>, f0: Vector3<f32>) -> Vector3<f32> {
    let factor = (1.0 - h.dot(v).max(0.0)).powi(5);
    f0 + (Vector3::repeat(1.0) - f0) * factor
}

/// Trowbridge-Reitz GGX normal distribution, with alpha = roughness^2.
pub fn normal_distribution_ggx(n: &Vector3<f32>, h: &Vector3<f32>, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let alpha_sq = alpha * alpha;
    let n_dot_h = n.dot(h).max(0.0);

    let denom = n_dot_h * n_dot_h * (alpha_sq - 1.0) + 1.0;
    alpha_sq / (PI * denom * denom)
}

/// Schlick-GGX geometry term for a single direction with remapped roughness `k`.
pub fn geometry_schlick_ggx(n: &Vector3<f32>, v: &Vector3<f32>, k: f32) -> f32 {
    let n_dot_v = n.dot(v).max(0.0);
    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

/// Smith geometry term for direct lighting: shadowing (`l`) times masking (`v`).
///
/// `v` points towards the eye. `k = (alpha + 1)^2 / 8` with alpha = roughness^2.
pub fn geometry_smith(n: &Vector3<f32>, v: &Vector3<f32>, l: &Vector3<f32>, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let k = (alpha + 1.0).powi(2) / 8.0;
    geometry_schlick_ggx(n, v, k) * geometry_schlick_ggx(n, l, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn lambert_divides_by_pi() {
        let c = lambert(1.0, Vector3::repeat(1.0));
        assert!((c.x - 1.0 / PI).abs() < EPS);
        let c = lambert_rgb(Vector3::new(1.0, 0.5, 0.0), Vector3::repeat(PI));
        assert!((c - Vector3::new(1.0, 0.5, 0.0)).norm() < EPS);
    }

    #[test]
    fn phong_peaks_in_mirror_direction() {
        let n = Vector3::y();
        let l = Vector3::new(1.0, 1.0, 0.0).normalize();
        // Eye ray travelling down the mirror direction.
        let v = Vector3::new(1.0, -1.0, 0.0).normalize();
        let spec = phong(0.5, 20.0, &l, &v, &n);
        assert!((spec.x - 0.5).abs() < 1e-4);
        assert_eq!(spec.x, spec.z);

        let off = phong(0.5, 20.0, &l, &Vector3::new(-1.0, -1.0, 0.0).normalize(), &n);
        assert!(off.x < EPS);
    }

    #[test]
    fn fresnel_at_normal_incidence_is_f0() {
        let f0 = Vector3::new(0.04, 0.04, 0.04);
        let f = fresnel_schlick(&Vector3::y(), &Vector3::y(), f0);
        assert!((f - f0).norm() < EPS);

        // Grazing angles reflect everything.
        let grazing = fresnel_schlick(&Vector3::y(), &Vector3::x(), f0);
        assert!((grazing - Vector3::repeat(1.0)).norm() < EPS);
    }

    #[test]
    fn ggx_peak_value() {
        let roughness = 0.5_f32;
        let alpha_sq = roughness.powi(4);
        let d = normal_distribution_ggx(&Vector3::y(), &Vector3::y(), roughness);
        assert!((d - 1.0 / (PI * alpha_sq)).abs() < 1e-3);
    }

    #[test]
    fn smith_is_one_head_on() {
        let g = geometry_smith(&Vector3::y(), &Vector3::y(), &Vector3::y(), 0.7);
        assert!((g - 1.0).abs() < EPS);
    }
}
