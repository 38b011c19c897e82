//! State metadata: postal code, FIPS code and congressional district count.
//!
//! District counts follow the 2010 apportionment, which matches the 2010
//! census geography the precinct files are built from. The District of
//! Columbia is compiled as a single district.

/// Metadata for one state or the District of Columbia.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateInfo {
    /// Full name.
    pub name: &'static str,
    /// Two-letter postal code.
    pub code: &'static str,
    /// Two-digit FIPS code.
    pub fips: &'static str,
    /// Number of congressional districts.
    pub districts: u32,
}

const fn state(name: &'static str, code: &'static str, fips: &'static str, districts: u32) -> StateInfo {
    StateInfo {
        name,
        code,
        fips,
        districts,
    }
}

/// The 50 states and DC, sorted by name.
pub const STATES: [StateInfo; 51] = [
    state("Alabama", "AL", "01", 7),
    state("Alaska", "AK", "02", 1),
    state("Arizona", "AZ", "04", 9),
    state("Arkansas", "AR", "05", 4),
    state("California", "CA", "06", 53),
    state("Colorado", "CO", "08", 7),
    state("Connecticut", "CT", "09", 5),
    state("Delaware", "DE", "10", 1),
    state("District of Columbia", "DC", "11", 1),
    state("Florida", "FL", "12", 27),
    state("Georgia", "GA", "13", 14),
    state("Hawaii", "HI", "15", 2),
    state("Idaho", "ID", "16", 2),
    state("Illinois", "IL", "17", 18),
    state("Indiana", "IN", "18", 9),
    state("Iowa", "IA", "19", 4),
    state("Kansas", "KS", "20", 4),
    state("Kentucky", "KY", "21", 6),
    state("Louisiana", "LA", "22", 6),
    state("Maine", "ME", "23", 2),
    state("Maryland", "MD", "24", 8),
    state("Massachusetts", "MA", "25", 9),
    state("Michigan", "MI", "26", 14),
    state("Minnesota", "MN", "27", 8),
    state("Mississippi", "MS", "28", 4),
    state("Missouri", "MO", "29", 8),
    state("Montana", "MT", "30", 1),
    state("Nebraska", "NE", "31", 3),
    state("Nevada", "NV", "32", 4),
    state("New Hampshire", "NH", "33", 2),
    state("New Jersey", "NJ", "34", 12),
    state("New Mexico", "NM", "35", 3),
    state("New York", "NY", "36", 27),
    state("North Carolina", "NC", "37", 13),
    state("North Dakota", "ND", "38", 1),
    state("Ohio", "OH", "39", 16),
    state("Oklahoma", "OK", "40", 5),
    state("Oregon", "OR", "41", 5),
    state("Pennsylvania", "PA", "42", 18),
    state("Rhode Island", "RI", "44", 2),
    state("South Carolina", "SC", "45", 7),
    state("South Dakota", "SD", "46", 1),
    state("Tennessee", "TN", "47", 9),
    state("Texas", "TX", "48", 36),
    state("Utah", "UT", "49", 4),
    state("Vermont", "VT", "50", 1),
    state("Virginia", "VA", "51", 11),
    state("Washington", "WA", "53", 10),
    state("West Virginia", "WV", "54", 3),
    state("Wisconsin", "WI", "55", 8),
    state("Wyoming", "WY", "56", 1),
];

/// Finds a state by name, slug (`new_york`) or postal code, ignoring case.
pub fn find_state(query: &str) -> Option<&'static StateInfo> {
    let query = query.trim();
    STATES.iter().find(|s| {
        s.code.eq_ignore_ascii_case(query)
            || s.name.eq_ignore_ascii_case(query)
            || crate::paths::state_slug(s.name) == crate::paths::state_slug(query)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_states_share_435_seats() {
        let seats: u32 = STATES.iter().filter(|s| s.code != "DC").map(|s| s.districts).sum();
        assert_eq!(seats, 435);
    }

    #[test]
    fn codes_and_fips_are_unique() {
        let mut codes: Vec<_> = STATES.iter().map(|s| s.code).collect();
        let mut fips: Vec<_> = STATES.iter().map(|s| s.fips).collect();
        codes.sort_unstable();
        codes.dedup();
        fips.sort_unstable();
        fips.dedup();
        assert_eq!(codes.len(), STATES.len());
        assert_eq!(fips.len(), STATES.len());
    }

    #[test]
    fn lookup_by_name_slug_or_code() {
        assert_eq!(find_state("iowa").map(|s| s.code), Some("IA"));
        assert_eq!(find_state("ny").map(|s| s.name), Some("New York"));
        assert_eq!(find_state("north_carolina").map(|s| s.fips), Some("37"));
        assert_eq!(find_state("District of Columbia").map(|s| s.districts), Some(1));
        assert!(find_state("Atlantis").is_none());
    }
}
