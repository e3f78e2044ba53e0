//! Shared utility functions for Campo crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

    /// Naive date-time layouts tried after RFC 3339 / RFC 2822 fail.
    const NAIVE_DATE_TIME_FORMATS: [&str; 3] =
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    /// Naive date layouts, tried last.
    const NAIVE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    /// Parse a user-entered year ("2020", " 2020 ").
    pub fn parse_year(s: &str) -> Option<i32> {
        s.trim().parse::<i32>().ok()
    }

    /// First day of a campaign year as the backend expects it: "YYYY-01-01".
    ///
    /// Returns `None` for blank input so the query parameter is omitted.
    pub fn year_start_param(year: &str) -> Option<String> {
        let year = year.trim();
        if year.is_empty() {
            None
        } else {
            Some(format!("{}-01-01", year))
        }
    }

    /// Last day of a campaign year as the backend expects it: "YYYY-12-31".
    pub fn year_end_param(year: &str) -> Option<String> {
        let year = year.trim();
        if year.is_empty() {
            None
        } else {
            Some(format!("{}-12-31", year))
        }
    }

    /// Parse a date string in any of the common layouts and return its
    /// UTC calendar year.
    ///
    /// Offsets are honoured: "2020-01-01T00:30:00+02:00" is still 2019 in UTC.
    pub fn utc_year_of(s: &str) -> Option<i32> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc).year());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc).year());
        }
        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(dt.and_utc().year());
            }
        }
        for format in NAIVE_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Some(date.year());
            }
        }
        None
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_year_params() {
            assert_eq!(year_start_param("2019"), Some("2019-01-01".to_string()));
            assert_eq!(year_end_param("2021"), Some("2021-12-31".to_string()));
            assert_eq!(year_start_param(""), None);
            assert_eq!(year_end_param("   "), None);
        }

        #[test]
        fn test_parse_year() {
            assert_eq!(parse_year("2020"), Some(2020));
            assert_eq!(parse_year(" 1999 "), Some(1999));
            assert_eq!(parse_year("20x0"), None);
            assert_eq!(parse_year(""), None);
        }

        #[test]
        fn test_utc_year_of() {
            assert_eq!(utc_year_of("2020-06-15T10:00:00Z"), Some(2020));
            assert_eq!(utc_year_of("2020-01-01T00:30:00+02:00"), Some(2019));
            assert_eq!(utc_year_of("Tue, 1 Jul 2003 10:52:37 +0200"), Some(2003));
            assert_eq!(utc_year_of("2018-03-04 12:00:00"), Some(2018));
            assert_eq!(utc_year_of("2017-12-31"), Some(2017));
            assert_eq!(utc_year_of("12/31/2016"), Some(2016));
            assert_eq!(utc_year_of("not a date"), None);
            assert_eq!(utc_year_of(""), None);
        }
    }
}

/// Number parsing and formatting
pub mod numbers {
    /// Leading integer of `s`, after optional whitespace and sign.
    ///
    /// Reading stops at the first non-digit, so `"12-0"` is 12 and `"20ab"`
    /// is 20. `None` when no digit follows the sign or the value does not
    /// fit an `i64`.
    pub fn parse_int_prefix(s: &str) -> Option<i64> {
        let s = s.trim_start();
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let value = rest[..digits].parse::<i64>().ok()?;
        Some(if negative { -value } else { value })
    }

    /// Leading decimal of `s`, after optional whitespace.
    ///
    /// Accepts a sign, digits with an optional fraction and an optional
    /// exponent, and ignores whatever follows: `"12.5%"` is 12.5. Blanks,
    /// garbage and non-finite results are `None`.
    pub fn parse_decimal(s: &str) -> Option<f64> {
        let s = s.trim_start();
        let end = decimal_prefix_len(s.as_bytes());
        if end == 0 {
            return None;
        }
        s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn digits_from(bytes: &[u8], start: usize) -> usize {
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        end
    }

    // Length of the longest `[sign] digits [. digits] [e [sign] digits]` prefix
    fn decimal_prefix_len(bytes: &[u8]) -> usize {
        let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
        let int_end = digits_from(bytes, end);
        let mut digits = int_end - end;
        end = int_end;
        if bytes.get(end) == Some(&b'.') {
            let frac_end = digits_from(bytes, end + 1);
            digits += frac_end - (end + 1);
            if digits > 0 {
                end = frac_end;
            }
        }
        if digits == 0 {
            return 0;
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp_start = end + 1;
            if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
                exp_start += 1;
            }
            let exp_end = digits_from(bytes, exp_start);
            if exp_end > exp_start {
                end = exp_end;
            }
        }
        end
    }

    /// Format with two decimals, the way the loss table shows percentages.
    pub fn fixed2(value: f64) -> String {
        format!("{:.2}", value)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_int_prefix() {
            assert_eq!(parse_int_prefix("2020"), Some(2020));
            assert_eq!(parse_int_prefix("12-0"), Some(12));
            assert_eq!(parse_int_prefix("20ab"), Some(20));
            assert_eq!(parse_int_prefix(" 202"), Some(202));
            assert_eq!(parse_int_prefix("-44x"), Some(-44));
            assert_eq!(parse_int_prefix("+7"), Some(7));
            assert_eq!(parse_int_prefix("abcd"), None);
            assert_eq!(parse_int_prefix("-"), None);
            assert_eq!(parse_int_prefix(""), None);
            assert_eq!(parse_int_prefix("99999999999999999999"), None);
        }

        #[test]
        fn test_parse_decimal() {
            assert_eq!(parse_decimal("12.5"), Some(12.5));
            assert_eq!(parse_decimal(" -3 "), Some(-3.0));
            assert_eq!(parse_decimal("abc"), None);
            assert_eq!(parse_decimal("NaN"), None);
            assert_eq!(parse_decimal("inf"), None);
            assert_eq!(parse_decimal("Infinity"), None);
            assert_eq!(parse_decimal(""), None);
            assert_eq!(parse_decimal("."), None);
        }

        #[test]
        fn test_parse_decimal_reads_leading_number() {
            assert_eq!(parse_decimal("12.5%"), Some(12.5));
            assert_eq!(parse_decimal("7,5"), Some(7.0));
            assert_eq!(parse_decimal(".5 ha"), Some(0.5));
            assert_eq!(parse_decimal("-.25"), Some(-0.25));
            assert_eq!(parse_decimal("5."), Some(5.0));
            assert_eq!(parse_decimal("1e3x"), Some(1000.0));
            assert_eq!(parse_decimal("2e"), Some(2.0));
            assert_eq!(parse_decimal("3E-1"), Some(0.3));
            assert_eq!(parse_decimal("1e999"), None);
        }

        #[test]
        fn test_fixed2() {
            assert_eq!(fixed2(10.0), "10.00");
            assert_eq!(fixed2(3.14159), "3.14");
        }
    }
}
