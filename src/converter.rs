use latlon_parser::{parse, to_signed_decimal_string, Axis, Coordinate, Error};
use std::fmt;

/// One converted input line. Failure rows keep the original text, leave the
/// value columns empty and carry the error text in `remark`.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub original: String,
    pub corrected: String,
    pub decimal: String,
    pub sexagesimal: String,
    pub remark: String,
}

impl Record {
    fn success(line: &str, lat: &Coordinate, lon: &Coordinate) -> Self {
        Self {
            original: line.to_string(),
            corrected: format!(
                "{} {}",
                lat.format(Axis::Latitude),
                lon.format(Axis::Longitude)
            ),
            decimal: format!(
                "{}, {}",
                to_signed_decimal_string(&lat.as_decimal().format(Axis::Latitude)),
                to_signed_decimal_string(&lon.as_decimal().format(Axis::Longitude))
            ),
            sexagesimal: format!(
                "{} {}",
                lat.as_degree_minutes_seconds().format(Axis::Latitude),
                lon.as_degree_minutes_seconds().format(Axis::Longitude)
            ),
            remark: String::new(),
        }
    }

    fn failure(line: &str, error: &Error) -> Self {
        Self {
            original: line.to_string(),
            corrected: String::new(),
            decimal: String::new(),
            sexagesimal: String::new(),
            remark: error.to_string(),
        }
    }
}

/// Convert one input line to a record. Never panics; a line that fails to
/// parse becomes a failure row so the surrounding stream keeps flowing.
pub fn convert_line(line: &str, lat_first: bool) -> Record {
    match parse(line, lat_first) {
        Ok((lat, lon)) => Record::success(line, &lat, &lon),
        Err(error) => Record::failure(line, &error),
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.original, self.corrected, self.decimal, self.sexagesimal, self.remark
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEntry {
        input: &'static str,
        expected_decimal: &'static str,
        expected_remark_fragment: &'static str,
    }

    #[test]
    fn test_line_conversion() {
        let tests = vec![
            TestEntry {
                input: "45°12'30''N 73°5'4''W",
                expected_decimal: "45.208333, -73.084444",
                expected_remark_fragment: "",
            },
            TestEntry {
                input: "-45.5, -73.25",
                expected_decimal: "-45.500000, -73.250000",
                expected_remark_fragment: "",
            },
            TestEntry {
                input: "73 W 45 N",
                expected_decimal: "45.000000, -73.000000",
                expected_remark_fragment: "",
            },
            TestEntry {
                input: "45X 73W",
                expected_decimal: "",
                expected_remark_fragment: "letters",
            },
            TestEntry {
                input: "45.5 73.25 10''",
                expected_decimal: "",
                expected_remark_fragment: "grammar",
            },
        ];

        for (i, test) in tests.iter().enumerate() {
            let record = convert_line(test.input, true);
            assert_eq!(
                record.decimal, test.expected_decimal,
                "Test case {i} failed: decimal '{}' != expected '{}'",
                record.decimal, test.expected_decimal
            );
            assert!(
                record.remark.contains(test.expected_remark_fragment),
                "Test case {i} failed: remark '{}' missing '{}'",
                record.remark,
                test.expected_remark_fragment
            );
            assert_eq!(record.original, test.input);
        }
    }

    #[test]
    fn failure_rows_leave_value_columns_empty() {
        let record = convert_line("45N 73S", true);
        assert!(record.corrected.is_empty());
        assert!(record.decimal.is_empty());
        assert!(record.sexagesimal.is_empty());
        assert!(!record.remark.is_empty());
    }

    #[test]
    fn records_render_tab_separated() {
        let record = convert_line("-45.5, -73.25", true);
        let rendered = record.to_string();
        assert_eq!(rendered.matches('\t').count(), 4);
        assert!(rendered.starts_with("-45.5, -73.25\t"));
    }
}
