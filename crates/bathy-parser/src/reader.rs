//! Line-oriented record reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bathy_common::{BathyError, BathyResult};
use tracing::{debug, info};

use crate::Record;

/// First character of a comment line.
pub const COMMENT_MARKER: char = '*';

/// Field separator within a record line.
pub const FIELD_DELIMITER: char = ',';

/// True if the line is a comment.
pub fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_MARKER)
}

/// Parse every record from `reader`.
///
/// `origin` names the source in error messages. Line numbers in errors are
/// 1-based physical lines, comments included.
pub fn parse_records<R, B>(reader: B, origin: &str) -> BathyResult<Vec<R>>
where
    R: Record,
    B: BufRead,
{
    let mut records = Vec::new();
    let mut comments = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| BathyError::io(origin, e))?;
        let line_number = index + 1;

        if is_comment(&line) {
            comments += 1;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = if R::TEXT_TAIL {
            line.splitn(R::FIELDS, FIELD_DELIMITER).collect()
        } else {
            line.split(FIELD_DELIMITER).collect()
        };

        if fields.len() != R::FIELDS {
            return Err(BathyError::malformed(
                origin,
                line_number,
                format!(
                    "expected {} fields for a {} record, found {}",
                    R::FIELDS,
                    R::KIND,
                    fields.len()
                ),
            ));
        }

        let record = R::from_fields(&fields)
            .map_err(|reason| BathyError::malformed(origin, line_number, reason))?;
        records.push(record);
    }

    debug!(
        origin,
        kind = R::KIND,
        records = records.len(),
        comments,
        "Parsed delimited records"
    );

    Ok(records)
}

/// Open `path` and parse every record in it.
///
/// The file handle is released before returning, on success or failure.
pub fn read_records<R: Record>(path: impl AsRef<Path>) -> BathyResult<Vec<R>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BathyError::io(path, e))?;
    let origin = path.display().to_string();

    let records = parse_records(BufReader::new(file), &origin)?;

    info!(
        file = %origin,
        kind = R::KIND,
        records = records.len(),
        "Read input file"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bathy_common::Sample;
    use std::io::Cursor;

    #[test]
    fn test_is_comment() {
        assert!(is_comment("* header"));
        assert!(is_comment("*"));
        assert!(!is_comment(" * indented"));
        assert!(!is_comment("18.5,-34.1,120.0"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let input = "18.5,-34.1,120.0\n\n   \n18.6,-34.1,-3.0\n";
        let samples: Vec<Sample> = parse_records(Cursor::new(input), "memory").unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_line_numbers_count_comments() {
        let input = "* one\n* two\n18.5,-34.1\n";
        let err = parse_records::<Sample, _>(Cursor::new(input), "bathy.dat").unwrap_err();
        match err {
            BathyError::MalformedRow { origin, line, .. } => {
                assert_eq!(origin, "bathy.dat");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "* dos file\r\n18.5,-34.1,120.0\r\n";
        let samples: Vec<Sample> = parse_records(Cursor::new(input), "memory").unwrap();
        assert_eq!(samples, vec![Sample::new(18.5, -34.1, 120.0)]);
    }
}
