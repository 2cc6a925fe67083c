//! ISO 3166-1 alpha-2 codes to English country names.
//!
//! Only consulted when a country field is a select whose options are full
//! names rather than codes.

const COUNTRIES: [(&str, &str); 50] = [
    ("AU", "Australia"),
    ("CA", "Canada"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("IN", "India"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("NZ", "New Zealand"),
    ("SG", "Singapore"),
    ("ES", "Spain"),
    ("SE", "Sweden"),
    ("CH", "Switzerland"),
    ("US", "United States"),
    ("AE", "United Arab Emirates"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
    ("HK", "Hong Kong"),
    ("IE", "Ireland"),
    ("NO", "Norway"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RU", "Russia"),
    ("SA", "Saudi Arabia"),
    ("ZA", "South Africa"),
    ("KR", "South Korea"),
    ("TH", "Thailand"),
    ("TR", "Turkey"),
    ("AT", "Austria"),
    ("CZ", "Czech Republic"),
    ("GR", "Greece"),
    ("HU", "Hungary"),
    ("IL", "Israel"),
    ("MY", "Malaysia"),
    ("PH", "Philippines"),
    ("RO", "Romania"),
    ("AR", "Argentina"),
    ("CL", "Chile"),
    ("CO", "Colombia"),
    ("EG", "Egypt"),
    ("ID", "Indonesia"),
    ("PK", "Pakistan"),
    ("PE", "Peru"),
    ("UA", "Ukraine"),
    ("VN", "Vietnam"),
];

/// Static code → name lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryDirectory;

impl CountryDirectory {
    /// English name for a two-letter code, case-insensitively.
    #[must_use]
    pub fn name(code: &str) -> Option<&'static str> {
        let code = code.trim();
        COUNTRIES
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, name)| *name)
    }

    /// Reverse lookup: the code for an exact English name.
    #[must_use]
    pub fn code(name: &str) -> Option<&'static str> {
        COUNTRIES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(code, _)| *code)
    }

    pub fn iter() -> impl Iterator<Item = (&'static str, &'static str)> {
        COUNTRIES.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn resolves_codes_case_insensitively() {
        assert_eq!(CountryDirectory::name("US"), Some("United States"));
        assert_eq!(CountryDirectory::name("gb"), Some("United Kingdom"));
        assert_eq!(CountryDirectory::name(" ca "), Some("Canada"));
        assert_eq!(CountryDirectory::name("XX"), None);
        assert_eq!(CountryDirectory::name(""), None);
    }

    #[test]
    fn reverse_lookup_is_exact() {
        assert_eq!(CountryDirectory::code("New Zealand"), Some("NZ"));
        assert_eq!(CountryDirectory::code("new zealand"), None);
    }

    #[test]
    fn table_has_fifty_unique_entries() {
        let codes: HashSet<_> = CountryDirectory::iter().map(|(c, _)| c).collect();
        let names: HashSet<_> = CountryDirectory::iter().map(|(_, n)| n).collect();
        assert_eq!(codes.len(), 50);
        assert_eq!(names.len(), 50);
        assert!(codes.iter().all(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_uppercase())));
    }
}
