//! XDS_ASCII / INTEGRATE.HKL reflection list.

use xtal_model::{Miller, UnitCell};

use crate::proxy::DataProxy;

/// One observation from an XDS reflection list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XdsRefl {
    pub hkl: Miller,
    pub iobs: f64,
    /// Negative for observations rejected by XDS.
    pub sigma: f64,
}

impl XdsRefl {
    pub fn new(hkl: Miller, iobs: f64, sigma: f64) -> Self {
        Self { hkl, iobs, sigma }
    }
}

/// Header values and observations of an XDS file.
#[derive(Debug, Clone, Default)]
pub struct XdsAscii {
    pub spacegroup_number: u16,
    pub unit_cell: UnitCell,
    pub wavelength: f64,
    pub data: Vec<XdsRefl>,
}

impl XdsAscii {
    pub fn new(spacegroup_number: u16, unit_cell: UnitCell, wavelength: f64) -> Self {
        Self {
            spacegroup_number,
            unit_cell,
            wavelength,
            data: Vec::new(),
        }
    }
}

/// [`DataProxy`] over XDS observations. Each row exposes two fields:
/// `0` = IOBS, `1` = SIGMA(IOBS).
#[derive(Debug, Clone, Copy)]
pub struct XdsDataProxy<'a> {
    pub xds: &'a XdsAscii,
}

impl XdsDataProxy<'_> {
    pub const IOBS: usize = 0;
    pub const SIGMA: usize = 1;
    const STRIDE: usize = 2;
}

impl<'a> XdsDataProxy<'a> {
    pub fn new(xds: &'a XdsAscii) -> Self {
        Self { xds }
    }
}

impl DataProxy for XdsDataProxy<'_> {
    fn stride(&self) -> usize {
        Self::STRIDE
    }

    fn size(&self) -> usize {
        self.xds.data.len() * Self::STRIDE
    }

    fn hkl_at(&self, offset: usize) -> Option<Miller> {
        Some(self.xds.data[offset / Self::STRIDE].hkl)
    }

    fn num_at(&self, offset: usize) -> f64 {
        let refl = &self.xds.data[offset / Self::STRIDE];
        match offset % Self::STRIDE {
            Self::IOBS => refl.iobs,
            _ => refl.sigma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_fields() {
        let mut xds = XdsAscii::new(19, UnitCell::default(), 1.0);
        xds.data.push(XdsRefl::new([1, 2, 3], 40.0, 2.0));
        xds.data.push(XdsRefl::new([-1, 0, 2], 7.0, -1.0));
        let proxy = XdsDataProxy::new(&xds);
        assert_eq!(proxy.row_count(), 2);
        assert_eq!(proxy.hkl_at(2), Some([-1, 0, 2]));
        assert_eq!(proxy.num_at(XdsDataProxy::IOBS), 40.0);
        assert_eq!(proxy.num_at(2 + XdsDataProxy::SIGMA), -1.0);
    }
}
