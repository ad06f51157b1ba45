//! Record schemas for the three input files.

use bathy_common::{CoastlineVertex, Landmark, Sample};

/// A typed record built from one delimited line.
pub trait Record: Sized {
    /// Short name used in logs and error messages.
    const KIND: &'static str;

    /// Exact number of fields a line must hold.
    const FIELDS: usize;

    /// When true the last field is free text: the line is split at most
    /// `FIELDS - 1` times so the text may contain delimiters.
    const TEXT_TAIL: bool = false;

    /// Convert the split fields. Returns a human-readable reason on failure.
    fn from_fields(fields: &[&str]) -> Result<Self, String>;
}

impl Record for Sample {
    const KIND: &'static str = "bathymetry";
    const FIELDS: usize = 3;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(Sample::new(
            parse_float(fields[0], "longitude")?,
            parse_float(fields[1], "latitude")?,
            parse_float(fields[2], "depth")?,
        ))
    }
}

impl Record for CoastlineVertex {
    const KIND: &'static str = "coastline";
    const FIELDS: usize = 3;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(CoastlineVertex::new(
            parse_float(fields[0], "x")?,
            parse_float(fields[1], "y")?,
            parse_int(fields[2], "command code")?,
        ))
    }
}

impl Record for Landmark {
    const KIND: &'static str = "landmark";
    const FIELDS: usize = 3;
    const TEXT_TAIL: bool = true;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(Landmark::new(
            parse_float(fields[0], "x")?,
            parse_float(fields[1], "y")?,
            fields[2].trim(),
        ))
    }
}

fn parse_float(field: &str, name: &str) -> Result<f64, String> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{} '{}' is not a number", name, field.trim()))
}

fn parse_int(field: &str, name: &str) -> Result<i32, String> {
    field
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("{} '{}' is not an integer", name, field.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_fields() {
        let sample = Sample::from_fields(&["18.5", "-34.1", "120.0"]).unwrap();
        assert_eq!(sample, Sample::new(18.5, -34.1, 120.0));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let sample = Sample::from_fields(&[" 18.5", "-34.1 ", " -7 "]).unwrap();
        assert_eq!(sample.depth, -7.0);
    }

    #[test]
    fn test_non_numeric_field() {
        let err = Sample::from_fields(&["18.5", "south", "1.0"]).unwrap_err();
        assert_eq!(err, "latitude 'south' is not a number");
    }

    #[test]
    fn test_code_must_be_integer() {
        assert!(CoastlineVertex::from_fields(&["18.5", "-34.1", "2.5"]).is_err());
        let vertex = CoastlineVertex::from_fields(&["18.5", "-34.1", "79"]).unwrap();
        assert_eq!(vertex.code, 79);
    }

    #[test]
    fn test_landmark_text() {
        let landmark = Landmark::from_fields(&["18.47", "-34.19", " Simon's Town \n"]).unwrap();
        assert_eq!(landmark.text, "Simon's Town");
    }
}
