//! Operator-list space group backend.

use xtal_model::Miller;

use crate::Symmetry;
use crate::error::Result;
use crate::op::{DEN, SymOp};

/// A space group described by its primitive operations and centering
/// vectors.
///
/// The reciprocal asymmetric unit is defined by a canonical representative:
/// among all `±h·R` the lexicographically largest index is the one inside
/// the asymmetric unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGroup {
    pub number: u16,
    pub name: String,
    /// Primitive operations, identity first.
    pub ops: Vec<SymOp>,
    /// Centering translations (in units of 1/[`DEN`]), zero vector excluded.
    pub centering: Vec<[i32; 3]>,
}

impl SpaceGroup {
    /// Build a group from coordinate triplets.
    pub fn from_triplets(
        number: u16,
        name: impl Into<String>,
        triplets: &[&str],
        centering: &[[i32; 3]],
    ) -> Result<Self> {
        let mut ops = triplets
            .iter()
            .map(|triplet| SymOp::parse(triplet))
            .collect::<Result<Vec<_>>>()?;
        if let Some(pos) = ops.iter().position(SymOp::is_identity) {
            ops.swap(0, pos);
        } else {
            ops.insert(0, SymOp::identity());
        }
        Ok(Self {
            number,
            name: name.into(),
            ops,
            centering: centering
                .iter()
                .copied()
                .filter(|vector| vector.iter().any(|&t| t.rem_euclid(DEN) != 0))
                .collect(),
        })
    }

    /// Number of symmetry operations including centering.
    pub fn order(&self) -> usize {
        self.ops.len() * (self.centering.len() + 1)
    }

    /// Asymmetric-unit representative and the code of the first operation
    /// that reaches it.
    fn reduce(&self, hkl: Miller) -> (Miller, i32) {
        let mut best = hkl;
        let mut best_isym = 1;
        for (i, op) in self.ops.iter().enumerate() {
            let direct = op.apply_to_hkl(hkl);
            let mate = direct.map(|x| -x);
            let isym = 2 * i as i32;
            if direct > best {
                best = direct;
                best_isym = isym + 1;
            }
            if mate > best {
                best = mate;
                best_isym = isym + 2;
            }
        }
        (best, best_isym)
    }
}

impl Symmetry for SpaceGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_in_asu(&self, hkl: Miller) -> bool {
        self.reduce(hkl).0 == hkl
    }

    fn to_asu(&self, hkl: Miller) -> (Miller, i32) {
        self.reduce(hkl)
    }

    fn is_systematic_absence(&self, hkl: Miller) -> bool {
        let shifted = |phase: i32| phase.rem_euclid(DEN) != 0;
        if self
            .centering
            .iter()
            .any(|vector| shifted((0..3).map(|i| hkl[i] * vector[i]).sum()))
        {
            return true;
        }
        self.ops
            .iter()
            .any(|op| op.apply_to_hkl(hkl) == hkl && shifted(op.phase_shift(hkl)))
    }
}
