//! Symmetry operations in coordinate-triplet notation.

use std::fmt;
use std::str::FromStr;

use xtal_model::Miller;

use crate::error::{Result, SymmetryError};

/// Denominator of translation components: translations are stored in
/// units of 1/24, which covers halves, thirds, quarters and sixths.
pub const DEN: i32 = 24;

/// A real-space symmetry operation `x' = R·x + t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymOp {
    pub rot: [[i32; 3]; 3],
    /// Translation in units of 1/[`DEN`], normalized to `0..DEN`.
    pub tran: [i32; 3],
}

impl SymOp {
    pub fn identity() -> Self {
        Self {
            rot: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
            tran: [0, 0, 0],
        }
    }

    /// Parse a triplet such as `-x,y+1/2,-z`.
    pub fn parse(triplet: &str) -> Result<Self> {
        let parts: Vec<&str> = triplet.split(',').collect();
        if parts.len() != 3 {
            return Err(SymmetryError::invalid_triplet(
                triplet,
                format!("expected 3 comma-separated parts, got {}", parts.len()),
            ));
        }
        let mut op = SymOp {
            rot: [[0; 3]; 3],
            tran: [0; 3],
        };
        for (i, part) in parts.iter().enumerate() {
            let (row, tran) = parse_row(part)
                .map_err(|message| SymmetryError::invalid_triplet(triplet, message))?;
            op.rot[i] = row;
            op.tran[i] = tran.rem_euclid(DEN);
        }
        Ok(op)
    }

    /// Transform a Miller index: `h' = h·R`.
    pub fn apply_to_hkl(&self, hkl: Miller) -> Miller {
        let mut out = [0; 3];
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = (0..3).map(|i| hkl[i] * self.rot[i][j]).sum();
        }
        out
    }

    /// Phase shift `h·t` in units of 1/[`DEN`] of a full cycle.
    pub fn phase_shift(&self, hkl: Miller) -> i32 {
        (0..3).map(|i| hkl[i] * self.tran[i]).sum()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl FromStr for SymOp {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SymOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const AXES: [char; 3] = ['x', 'y', 'z'];
        for (i, row) in self.rot.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let mut empty = true;
            for (coef, axis) in row.iter().zip(AXES) {
                match *coef {
                    0 => continue,
                    1 if empty => write!(f, "{axis}")?,
                    1 => write!(f, "+{axis}")?,
                    -1 => write!(f, "-{axis}")?,
                    c if empty => write!(f, "{c}{axis}")?,
                    c => write!(f, "{c:+}{axis}")?,
                }
                empty = false;
            }
            let t = self.tran[i];
            if t != 0 {
                let g = gcd(t, DEN);
                let sign = if empty { "" } else { "+" };
                write!(f, "{sign}{}/{}", t / g, DEN / g)?;
            } else if empty {
                f.write_str("0")?;
            }
        }
        Ok(())
    }
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

/// Parse one component of a triplet into a rotation row and a translation.
fn parse_row(expr: &str) -> std::result::Result<([i32; 3], i32), String> {
    let chars: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err("empty component".to_string());
    }
    let mut row = [0; 3];
    let mut tran = 0;
    let mut pos = 0;
    while pos < chars.len() {
        let sign = match chars[pos] {
            '+' => {
                pos += 1;
                1
            }
            '-' => {
                pos += 1;
                -1
            }
            _ if pos == 0 => 1,
            other => return Err(format!("expected '+' or '-' before '{other}'")),
        };
        let num_start = pos;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
        }
        let number: Option<i32> = if pos > num_start {
            let text: String = chars[num_start..pos].iter().collect();
            Some(text.parse().map_err(|_| format!("bad number '{text}'"))?)
        } else {
            None
        };
        match chars.get(pos) {
            Some(&c) if matches!(c.to_ascii_lowercase(), 'x' | 'y' | 'z') => {
                let axis = (c.to_ascii_lowercase() as u8 - b'x') as usize;
                row[axis] += sign * number.unwrap_or(1);
                pos += 1;
            }
            Some('/') => {
                let Some(numerator) = number else {
                    return Err("fraction without numerator".to_string());
                };
                pos += 1;
                let den_start = pos;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let text: String = chars[den_start..pos].iter().collect();
                let denominator: i32 = text
                    .parse()
                    .map_err(|_| format!("bad denominator '{text}'"))?;
                if denominator == 0 || DEN % denominator != 0 {
                    return Err(format!("unsupported denominator {denominator}"));
                }
                tran += sign * numerator * (DEN / denominator);
            }
            _ => match number {
                Some(value) => tran += sign * value * DEN,
                None => return Err(format!("unexpected character in '{expr}'")),
            },
        }
    }
    Ok((row, tran))
}
