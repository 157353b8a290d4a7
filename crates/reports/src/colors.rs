pub const SKY_BLUE: &str = "#87CEEB";
pub const ORANGE: &str = "#FFA500";
pub const VIOLET: &str = "#EE82EE";
