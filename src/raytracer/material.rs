use crate::core::brdf::{
    fresnel_schlick, geometry_smith, lambert, lambert_rgb, normal_distribution_ggx, phong,
};
use crate::raytracer::hit::HitRecord;
use nalgebra::Vector3;

/// Base reflectivity of dielectrics.
const DIELECTRIC_F0: f32 = 0.04;

/// Defines how a surface scatters light towards the eye.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Constant color, independent of light and view.
    SolidColor { color: Vector3<f32> },
    Lambert { color: Vector3<f32>, kd: f32 },
    LambertPhong {
        color: Vector3<f32>,
        kd: f32,
        ks: f32,
        exponent: f32,
    },
    /// Metallic-roughness microfacet model.
    CookTorrance {
        albedo: Vector3<f32>,
        /// 0 = dielectric, 1 = metal.
        metalness: f32,
        roughness: f32,
    },
}

impl Material {
    /// Evaluates the BRDF at a hit.
    ///
    /// `l` is the unit direction from the hit towards the light, `v` the unit
    /// direction of the viewing ray (towards the hit).
    pub fn shade(&self, hit: &HitRecord, l: &Vector3<f32>, v: &Vector3<f32>) -> Vector3<f32> {
        let n = &hit.normal;
        match *self {
            Material::SolidColor { color } => color,
            Material::Lambert { color, kd } => lambert(kd, color),
            Material::LambertPhong {
                color,
                kd,
                ks,
                exponent,
            } => lambert(kd, color) + phong(ks, exponent, l, v, n),
            Material::CookTorrance {
                albedo,
                metalness,
                roughness,
            } => cook_torrance(albedo, metalness, roughness, n, l, v),
        }
    }
}

fn cook_torrance(
    albedo: Vector3<f32>,
    metalness: f32,
    roughness: f32,
    n: &Vector3<f32>,
    l: &Vector3<f32>,
    v: &Vector3<f32>,
) -> Vector3<f32> {
    let to_eye = -v;
    let h = (to_eye + l).normalize();

    let f0 = Vector3::repeat(DIELECTRIC_F0).lerp(&albedo, metalness);
    let f = fresnel_schlick(&h, &to_eye, f0);
    let d = normal_distribution_ggx(n, &h, roughness);
    let g = geometry_smith(n, &to_eye, l, roughness);

    let denom = 4.0 * n.dot(&to_eye).max(0.0) * n.dot(l).max(0.0);
    let specular = f * (d * g) / denom.max(1e-4);

    let kd = (Vector3::repeat(1.0) - f) * (1.0 - metalness);
    lambert_rgb(kd, albedo) + specular
}
