//! Unit-cell geometry.

use crate::refl::Miller;

/// Converts a Miller index into reciprocal spacing.
///
/// Implemented by [`UnitCell`]; any other metric (for example a cell refined
/// per batch) can stand in for it.
pub trait Geometry {
    /// Squared reciprocal spacing `1/d²` of the lattice plane family `hkl`.
    fn reciprocal_spacing_squared(&self, hkl: Miller) -> f64;

    /// Resolution `d` in Angstroms.
    fn resolution(&self, hkl: Miller) -> f64 {
        1.0 / self.reciprocal_spacing_squared(hkl).sqrt()
    }
}

/// Unit cell: edge lengths in Angstroms, angles in degrees.
///
/// The reciprocal metric tensor is computed once on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCell {
    params: [f64; 6],
    /// a*², b*², c*², 2a*b*cosγ*, 2a*c*cosβ*, 2b*c*cosα*
    metric: [f64; 6],
}

impl Default for UnitCell {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 90.0, 90.0, 90.0)
    }
}

impl UnitCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let params = [a, b, c, alpha, beta, gamma];
        Self {
            params,
            metric: reciprocal_metric(params),
        }
    }

    pub fn from_params(params: [f64; 6]) -> Self {
        Self::new(
            params[0], params[1], params[2], params[3], params[4], params[5],
        )
    }

    pub fn params(&self) -> [f64; 6] {
        self.params
    }

    pub fn a(&self) -> f64 {
        self.params[0]
    }

    pub fn b(&self) -> f64 {
        self.params[1]
    }

    pub fn c(&self) -> f64 {
        self.params[2]
    }

    /// True for a usable crystal cell: positive edges and angles that
    /// enclose a positive volume.
    pub fn is_crystal(&self) -> bool {
        self.params[..3].iter().all(|&edge| edge > 0.0) && self.volume() > 0.0
    }

    /// Cell volume in cubic Angstroms; NaN when the angles cannot close.
    pub fn volume(&self) -> f64 {
        volume(self.params)
    }
}

impl Geometry for UnitCell {
    fn reciprocal_spacing_squared(&self, hkl: Miller) -> f64 {
        let [h, k, l] = hkl.map(f64::from);
        let m = &self.metric;
        h * h * m[0] + k * k * m[1] + l * l * m[2] + h * k * m[3] + h * l * m[4] + k * l * m[5]
    }
}

fn cos_deg(angle: f64) -> f64 {
    // exact zero for right angles keeps orthogonal metrics free of noise
    if angle == 90.0 { 0.0 } else { angle.to_radians().cos() }
}

fn volume(params: [f64; 6]) -> f64 {
    let [a, b, c, alpha, beta, gamma] = params;
    let (ca, cb, cg) = (cos_deg(alpha), cos_deg(beta), cos_deg(gamma));
    a * b * c * (1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg).sqrt()
}

fn reciprocal_metric(params: [f64; 6]) -> [f64; 6] {
    let [a, b, c, alpha, beta, gamma] = params;
    let (ca, cb, cg) = (cos_deg(alpha), cos_deg(beta), cos_deg(gamma));
    let (sa, sb, sg) = (
        alpha.to_radians().sin(),
        beta.to_radians().sin(),
        gamma.to_radians().sin(),
    );
    let volume = volume(params);
    let ar = b * c * sa / volume;
    let br = a * c * sb / volume;
    let cr = a * b * sg / volume;
    let cos_alpha_r = (cb * cg - ca) / (sb * sg);
    let cos_beta_r = (ca * cg - cb) / (sa * sg);
    let cos_gamma_r = (ca * cb - cg) / (sa * sb);
    [
        ar * ar,
        br * br,
        cr * cr,
        2.0 * ar * br * cos_gamma_r,
        2.0 * ar * cr * cos_beta_r,
        2.0 * br * cr * cos_alpha_r,
    ]
}
