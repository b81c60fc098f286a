//! Built-in space-group table.

use crate::error::{Result, SymmetryError};
use crate::group::SpaceGroup;

/// Static description of a space group.
#[derive(Debug)]
pub struct SpaceGroupEntry {
    pub number: u16,
    /// Full Hermann-Mauguin symbol.
    pub hm: &'static str,
    /// Short symbol, if different from `hm`.
    pub short: Option<&'static str>,
    pub ops: &'static [&'static str],
    pub centering: &'static [[i32; 3]],
}

impl SpaceGroupEntry {
    pub fn build(&self) -> Result<SpaceGroup> {
        SpaceGroup::from_triplets(self.number, self.hm, self.ops, self.centering)
    }

    fn matches_name(&self, wanted: &str) -> bool {
        compact(self.hm) == wanted || self.short.is_some_and(|short| compact(short) == wanted)
    }
}

const SPACE_GROUPS: &[SpaceGroupEntry] = &[
    SpaceGroupEntry {
        number: 1,
        hm: "P 1",
        short: None,
        ops: &["x,y,z"],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 2,
        hm: "P -1",
        short: None,
        ops: &["x,y,z", "-x,-y,-z"],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 3,
        hm: "P 1 2 1",
        short: Some("P 2"),
        ops: &["x,y,z", "-x,y,-z"],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 4,
        hm: "P 1 21 1",
        short: Some("P 21"),
        ops: &["x,y,z", "-x,y+1/2,-z"],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 5,
        hm: "C 1 2 1",
        short: Some("C 2"),
        ops: &["x,y,z", "-x,y,-z"],
        centering: &[[12, 12, 0]],
    },
    SpaceGroupEntry {
        number: 16,
        hm: "P 2 2 2",
        short: None,
        ops: &["x,y,z", "-x,-y,z", "-x,y,-z", "x,-y,-z"],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 19,
        hm: "P 21 21 21",
        short: None,
        ops: &[
            "x,y,z",
            "-x+1/2,-y,z+1/2",
            "-x,y+1/2,-z+1/2",
            "x+1/2,-y+1/2,-z",
        ],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 96,
        hm: "P 43 21 2",
        short: None,
        ops: &[
            "x,y,z",
            "-x,-y,z+1/2",
            "-y+1/2,x+1/2,z+3/4",
            "y+1/2,-x+1/2,z+1/4",
            "-x+1/2,y+1/2,-z+3/4",
            "x+1/2,-y+1/2,-z+1/4",
            "y,x,-z",
            "-y,-x,-z+1/2",
        ],
        centering: &[],
    },
    SpaceGroupEntry {
        number: 146,
        hm: "H 3",
        short: Some("R 3"),
        ops: &["x,y,z", "-y,x-y,z", "-x+y,-x,z"],
        centering: &[[16, 8, 8], [8, 16, 16]],
    },
];

/// All space groups known to the built-in table, in number order.
pub fn builtin_spacegroups() -> &'static [SpaceGroupEntry] {
    SPACE_GROUPS
}

pub fn find_spacegroup_by_number(number: u16) -> Result<SpaceGroup> {
    SPACE_GROUPS
        .iter()
        .find(|entry| entry.number == number)
        .ok_or_else(|| SymmetryError::unknown_spacegroup(number.to_string()))?
        .build()
}

/// Look up a group by Hermann-Mauguin symbol, ignoring spaces and case.
pub fn find_spacegroup_by_name(name: &str) -> Result<SpaceGroup> {
    let wanted = compact(name);
    SPACE_GROUPS
        .iter()
        .find(|entry| entry.matches_name(&wanted))
        .ok_or_else(|| SymmetryError::unknown_spacegroup(name.trim()))?
        .build()
}

/// Look up a group by number (`"19"`) or by symbol (`"P212121"`).
pub fn find_spacegroup(name_or_number: &str) -> Result<SpaceGroup> {
    match name_or_number.trim().parse::<u16>() {
        Ok(number) => find_spacegroup_by_number(number),
        Err(_) => find_spacegroup_by_name(name_or_number),
    }
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_builds() {
        for entry in builtin_spacegroups() {
            let sg = entry.build().expect("builtin group parses");
            assert_eq!(sg.number, entry.number);
            assert!(sg.ops[0].is_identity());
        }
    }

    #[test]
    fn lookup_by_name_variants() {
        assert_eq!(find_spacegroup("P212121").unwrap().number, 19);
        assert_eq!(find_spacegroup("p 21 21 21").unwrap().number, 19);
        assert_eq!(find_spacegroup("P 21").unwrap().number, 4);
        assert_eq!(find_spacegroup("R3").unwrap().number, 146);
        assert_eq!(find_spacegroup(" 96 ").unwrap().name, "P 43 21 2");
    }

    #[test]
    fn unknown_lookup_fails() {
        assert!(find_spacegroup_by_number(230).is_err());
        let err = find_spacegroup("Q 7").unwrap_err();
        assert_eq!(err.to_string(), "unknown space group: Q 7");
    }
}
