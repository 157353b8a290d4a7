//! Umpire nationality report.

use ipl_charts::{Bar, ChartBody, ChartSpec};
use ipl_core::umpires::{COUNTRY, UMPIRE};
use ipl_core::{Record, Result};
use ipl_views::{accumulate, count_one, Grouped};

use crate::colors::SKY_BLUE;

/// Umpires per country, leaving out blank rows and `home_country`
/// (compared case-insensitively).
pub fn foreign_umpires<I>(umpires: I, home_country: &str) -> Result<Grouped<String, u64>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    accumulate(
        umpires,
        |u: &Record| {
            let umpire = u.text(UMPIRE)?;
            let country = u.text(COUNTRY)?;
            let country = country.trim();
            Ok(!umpire.trim().is_empty()
                && !country.is_empty()
                && !country.eq_ignore_ascii_case(home_country))
        },
        |u: &Record| Ok(u.text(COUNTRY)?.trim().to_string()),
        count_one,
    )
}

pub fn foreign_umpires_chart(home_country: &str, counts: &Grouped<String, u64>) -> ChartSpec {
    ChartSpec {
        title: format!("Umpires in IPL from outside {home_country} (Count by Country)"),
        x_label: "Country".to_string(),
        y_label: "Number of Umpires".to_string(),
        body: ChartBody::Bars {
            bars: counts.iter().map(|(c, n)| Bar::new(c.as_str(), *n as f64)).collect(),
            color: Some(SKY_BLUE.to_string()),
        },
    }
}
