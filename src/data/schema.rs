/// Column-name constants for the OKR input file.

pub const GOAL: &str = "goal";
pub const OBJECTIVE: &str = "objective";
pub const OKR: &str = "okr";
pub const STATUS: &str = "status";

pub const REQUIRED: [&str; 4] = [GOAL, OBJECTIVE, OKR, STATUS];
