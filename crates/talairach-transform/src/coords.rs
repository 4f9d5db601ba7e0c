//! Tab-delimited coordinate files.
//!
//! One point (or, for transposed input, one axis) per line, fields separated
//! by a single tab.  Blank lines are ignored; every other line must carry the
//! same number of fields as the first.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use talairach_types::{CoordinateMatrix, PointSet, TalError};
use tracing::debug;

/// Decimal places used for the intermediate file handed to the daemon.
pub const COORD_PRECISION: usize = 2;

/// Read a coordinate table from `path`.
///
/// # Errors
///
/// [`TalError::Io`] when the file cannot be read, [`TalError::Csv`] when it
/// is not valid UTF-8, [`TalError::Parse`] for a non-numeric field or a line
/// with the wrong number of fields.
pub fn read_coordinates(path: &Path) -> Result<CoordinateMatrix, TalError> {
    let bytes = fs::read(path).map_err(|e| TalError::io(path, e))?;
    let matrix = parse_records(&bytes, path)?;
    debug!(path = %path.display(), shape = ?matrix.shape(), "coordinates read");
    Ok(matrix)
}

/// Parse tab-delimited text.  `source` is only used in error messages.
pub fn parse_coordinates(text: &str, source: &Path) -> Result<CoordinateMatrix, TalError> {
    parse_records(text.as_bytes(), source)
}

fn parse_records(text: &[u8], source: &Path) -> Result<CoordinateMatrix, TalError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TalError::csv(source, e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record_line(text, &record);
        let parse_err = |message: String| TalError::Parse {
            path: source.to_path_buf(),
            line: line_no,
            message,
        };

        let row = record
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|e| parse_err(format!("invalid number {field:?}: {e}")))
            })
            .collect::<Result<Vec<f64>, TalError>>()?;

        if let Some(first) = rows.first()
            && first.len() != row.len()
        {
            return Err(parse_err(format!(
                "expected {} fields, found {}",
                first.len(),
                row.len()
            )));
        }
        rows.push(row);
    }

    CoordinateMatrix::from_rows(rows)
}

/// 1-based line of `record` in `text`.
///
/// The reader may report a record as starting on a blank line it skipped, so
/// line breaks after the reported offset are stepped over before counting.
fn record_line(text: &[u8], record: &StringRecord) -> usize {
    let reported = record
        .position()
        .map_or(0, |p| p.byte() as usize)
        .min(text.len());
    let start = text[reported..]
        .iter()
        .position(|&b| b != b'\r' && b != b'\n')
        .map_or(text.len(), |skip| reported + skip);
    text[..start].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Write points to `path` with `precision` decimals, creating parent
/// directories as needed.
pub fn write_coordinates(path: &Path, points: &PointSet, precision: usize) -> Result<(), TalError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| TalError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| TalError::io(path, e))?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    for p in points {
        writer
            .write_record(p.to_array().map(|v| format!("{v:.precision$}")))
            .map_err(|e| TalError::csv(path, e))?;
    }
    writer.flush().map_err(|e| TalError::io(path, e))?;

    debug!(path = %path.display(), points = points.len(), precision, "coordinates written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mni_to_talairach;
    use talairach_types::Point3;

    fn src() -> &'static Path {
        Path::new("electrodes.txt")
    }

    #[test]
    fn parses_tab_delimited_lines() {
        let m = parse_coordinates("10.0\t20.0\t30.0\n-1.5\t2\t3e1\n", src()).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.as_rows()[1], vec![-1.5, 2.0, 30.0]);
    }

    #[test]
    fn tolerates_crlf_and_blank_lines() {
        let m = parse_coordinates("1\t2\t3\r\n\r\n4\t5\t6\r\n\n", src()).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.as_rows()[1], vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn trims_fields_and_skips_whitespace_lines() {
        let m = parse_coordinates(" 1 \t2\t 3\n   \n4\t5\t6\n", src()).unwrap();
        assert_eq!(m.as_rows(), &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn non_numeric_field_reports_line() {
        let err = parse_coordinates("1\t2\t3\n4\tabc\t6\n", src()).unwrap_err();
        match err {
            TalError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inconsistent_field_count_reports_line() {
        let err = parse_coordinates("1\t2\t3\n\n4\t5\n", src()).unwrap_err();
        assert!(matches!(err, TalError::Parse { line: 3, .. }), "got {err}");

        let err = parse_coordinates("\r\n\r\n1\t2\t3\r\n4\t5\t6\t7\r\n", src()).unwrap_err();
        assert!(matches!(err, TalError::Parse { line: 4, .. }), "got {err}");
    }

    #[test]
    fn empty_text_yields_empty_matrix() {
        let m = parse_coordinates("", src()).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn write_uses_fixed_precision() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("coordinates.txt");
        let points = PointSet::new(vec![Point3::new(7.9273, 14.2043, 32.7826), Point3::new(-1.0, 0.0, 0.5)]);

        write_coordinates(&path, &points, 2).expect("write");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "7.93\t14.20\t32.78\n-1.00\t0.00\t0.50\n"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = read_coordinates(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, TalError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_is_a_csv_error_naming_the_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("electrodes.txt");
        fs::write(&path, b"1\t2\t3\n\xff\t5\t6\n").unwrap();

        let err = read_coordinates(&path).unwrap_err();
        assert!(matches!(err, TalError::Csv { .. }), "got {err}");
        assert!(err.to_string().contains("electrodes.txt"), "{err}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn write_then_read_stays_within_rounding() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("nested").join("coordinates.txt");

        let mni = parse_coordinates(
            "10.0\t20.0\t30.0\n-40.0\t12.0\t55.0\n33.3\t-71.9\t8.8\n-0.004\t0.006\t-12.345\n",
            src(),
        )
        .unwrap();
        let tal = mni_to_talairach(&mni).unwrap();
        write_coordinates(&path, &tal, COORD_PRECISION).expect("write");

        let back = read_coordinates(&path).expect("read");
        assert_eq!(back.shape(), (tal.len(), 3));
        for (p, row) in tal.iter().zip(back.as_rows()) {
            for (expected, actual) in p.to_array().iter().zip(row) {
                assert!((expected - actual).abs() <= 0.005 + 1e-12, "{expected} vs {actual}");
            }
        }
    }

    #[test]
    fn single_line_file_end_to_end() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let input = dir.path().join("elecs.txt");
        let output = dir.path().join("coordinates.txt");
        fs::write(&input, "10.0\t20.0\t30.0").unwrap();

        let tal = mni_to_talairach(&read_coordinates(&input).unwrap()).unwrap();
        write_coordinates(&output, &tal, COORD_PRECISION).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "7.93\t14.20\t32.78\n");
    }
}
