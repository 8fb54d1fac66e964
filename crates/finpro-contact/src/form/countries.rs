use regex::Regex;

/// One row of the dialing-code table: calling code, country name, the
/// digit-count pattern a national number must satisfy once formatting
/// characters are stripped, and the hint shown when validation fails.
#[derive(Debug, Clone, Copy)]
pub struct CountryDialingCode {
    pub calling_code: &'static str,
    pub country: &'static str,
    pub digit_pattern: &'static str,
    pub format_hint: &'static str,
}

/// Supported calling codes. Validation is a table lookup plus a regex
/// match over the digits, never a chain of per-country conditionals.
pub const COUNTRY_DIALING_CODES: &[CountryDialingCode] = &[
    CountryDialingCode {
        calling_code: "+33",
        country: "France",
        digit_pattern: "^[0-9]{9}$",
        format_hint: "9 chiffres (ex: 6 12 34 56 78)",
    },
    CountryDialingCode {
        calling_code: "+221",
        country: "Sénégal",
        digit_pattern: "^[0-9]{9}$",
        format_hint: "9 chiffres (ex: 76 464 42 90)",
    },
    CountryDialingCode {
        calling_code: "+1",
        country: "États-Unis / Canada",
        digit_pattern: "^[0-9]{10}$",
        format_hint: "10 chiffres (ex: 415 555 0132)",
    },
    CountryDialingCode {
        calling_code: "+44",
        country: "Royaume-Uni",
        digit_pattern: "^[0-9]{10}$",
        format_hint: "10 chiffres (ex: 7911 123456)",
    },
    CountryDialingCode {
        calling_code: "+49",
        country: "Allemagne",
        digit_pattern: "^[0-9]{10,11}$",
        format_hint: "10 à 11 chiffres (ex: 151 23456789)",
    },
    CountryDialingCode {
        calling_code: "+32",
        country: "Belgique",
        digit_pattern: "^[0-9]{8,9}$",
        format_hint: "8 à 9 chiffres (ex: 470 12 34 56)",
    },
    CountryDialingCode {
        calling_code: "+41",
        country: "Suisse",
        digit_pattern: "^[0-9]{9}$",
        format_hint: "9 chiffres (ex: 79 123 45 67)",
    },
    CountryDialingCode {
        calling_code: "+225",
        country: "Côte d'Ivoire",
        digit_pattern: "^[0-9]{10}$",
        format_hint: "10 chiffres (ex: 07 07 12 34 56)",
    },
    CountryDialingCode {
        calling_code: "+212",
        country: "Maroc",
        digit_pattern: "^[0-9]{9}$",
        format_hint: "9 chiffres (ex: 612 345 678)",
    },
];

/// Look up a table entry by calling code (e.g. `"+221"`).
pub fn lookup(calling_code: &str) -> Option<&'static CountryDialingCode> {
    COUNTRY_DIALING_CODES
        .iter()
        .find(|entry| entry.calling_code == calling_code)
}

impl CountryDialingCode {
    /// Strip spaces, dots, dashes, and parentheses and match the remaining
    /// digits against the country pattern.
    pub fn matches(&self, phone: &str) -> bool {
        let digits = national_digits(phone);
        let pattern = Regex::new(self.digit_pattern).expect("static phone pattern");
        pattern.is_match(&digits)
    }
}

/// The digits a caller actually typed, with common formatting removed.
pub fn national_digits(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
}
