// The league is a closed group. Any match must draw both sides from this list, and it is not configurable at runtime.
pub const ROSTER: [&str; 3] = ["ERON", "ARIN", "LAWIN"];

pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;

// Highest score accepted from match input
pub const MAX_SCORE: u32 = 9999;

pub fn is_on_roster(roster: &[impl AsRef<str>], name: &str) -> bool {
    roster.iter().any(|r| r.as_ref() == name)
}
