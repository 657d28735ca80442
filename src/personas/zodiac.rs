use chrono::{ Datelike, NaiveDate };

/// French zodiac sign for a birth date. Boundary days are inclusive on both
/// ends (Bélier covers March 21 through April 19).
pub fn sign_for_date(date: NaiveDate) -> &'static str {
    match (date.month(), date.day()) {
        (3, 21..=31) | (4, 1..=19) => "Bélier",
        (4, 20..=30) | (5, 1..=20) => "Taureau",
        (5, 21..=31) | (6, 1..=21) => "Gémeaux",
        (6, 22..=30) | (7, 1..=22) => "Cancer",
        (7, 23..=31) | (8, 1..=22) => "Lion",
        (8, 23..=31) | (9, 1..=22) => "Vierge",
        (9, 23..=30) | (10, 1..=22) => "Balance",
        (10, 23..=31) | (11, 1..=21) => "Scorpion",
        (11, 22..=30) | (12, 1..=21) => "Sagittaire",
        (1, 20..=31) | (2, 1..=18) => "Verseau",
        (2, 19..=29) | (3, 1..=20) => "Poissons",
        // December 22 through January 19; dates are valid by construction.
        _ => "Capricorne",
    }
}

/// Parse an ISO `YYYY-MM-DD` birth date and resolve its sign.
pub fn sign_from_birth_date(birth_date: &str) -> Option<&'static str> {
    NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
        .ok()
        .map(sign_for_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(y: i32, m: u32, d: u32) -> &'static str {
        sign_for_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn march_25_is_belier() {
        assert_eq!(sign(1990, 3, 25), "Bélier");
    }

    #[test]
    fn belier_boundaries_are_inclusive() {
        assert_eq!(sign(2000, 3, 21), "Bélier");
        assert_eq!(sign(2000, 4, 19), "Bélier");
        assert_eq!(sign(2000, 3, 20), "Poissons");
        assert_eq!(sign(2000, 4, 20), "Taureau");
    }

    #[test]
    fn capricorne_spans_the_new_year() {
        assert_eq!(sign(1999, 12, 22), "Capricorne");
        assert_eq!(sign(2000, 1, 19), "Capricorne");
        assert_eq!(sign(2000, 1, 20), "Verseau");
        assert_eq!(sign(1999, 12, 21), "Sagittaire");
    }

    #[test]
    fn leap_day_is_poissons() {
        assert_eq!(sign(2000, 2, 29), "Poissons");
    }

    #[test]
    fn parses_iso_birth_dates() {
        assert_eq!(sign_from_birth_date("1990-03-25"), Some("Bélier"));
        assert_eq!(sign_from_birth_date(" 1990-03-25 "), Some("Bélier"));
        assert_eq!(sign_from_birth_date("25/03/1990"), None);
        assert_eq!(sign_from_birth_date(""), None);
    }
}
