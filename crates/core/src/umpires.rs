pub const UMPIRE: &str = "umpire";
pub const COUNTRY: &str = "country";

pub const HOME_COUNTRY: &str = "India";
