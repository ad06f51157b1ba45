//! Tests for reading the delimited input files from disk.

use std::io::Cursor;

use bathy_common::{BathyError, CoastlineVertex, Landmark, Sample};
use bathy_parser::{parse_records, read_records};
use test_utils::fixtures;
use test_utils::write_text_file;

// ============================================================================
// Bathymetry records
// ============================================================================

#[test]
fn test_sample_line() {
    let samples: Vec<Sample> = parse_records(Cursor::new("18.5,-34.1,120.0\n"), "memory").unwrap();
    assert_eq!(samples, vec![Sample::new(18.5, -34.1, 120.0)]);
}

#[test]
fn test_comment_lines_not_counted() {
    let input = "* lon,lat,depth\n*18.5,-34.1,120.0\n18.5,-34.1,120.0\n* trailing\n";
    let samples: Vec<Sample> = parse_records(Cursor::new(input), "memory").unwrap();
    assert_eq!(samples.len(), 1);
}

#[test]
fn test_bathymetry_fixture_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_text_file(dir.path(), "bathy.dat", fixtures::BATHYMETRY_2X2);

    let samples: Vec<Sample> = read_records(&path).unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0], Sample::new(18.0, -34.0, -40.0));
    assert_eq!(samples[3].depth, 12.0);
}

#[test]
fn test_wrong_field_count_fails_whole_read() {
    let input = "18.5,-34.1,120.0\n18.6,-34.1,110.0,extra\n18.7,-34.1,100.0\n";
    let err = parse_records::<Sample, _>(Cursor::new(input), "bathy.dat").unwrap_err();
    assert!(matches!(err, BathyError::MalformedRow { line: 2, .. }));
    assert!(err.to_string().contains("expected 3 fields"));
}

// ============================================================================
// Coastline records
// ============================================================================

#[test]
fn test_coastline_fixture_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_text_file(dir.path(), "coastline.dat", fixtures::COASTLINE_SQUARE);

    let vertices: Vec<CoastlineVertex> = read_records(&path).unwrap();
    let codes: Vec<i32> = vertices.iter().map(|v| v.code).collect();
    assert_eq!(codes, vec![1, 2, 2, 2, 79]);
}

// ============================================================================
// Landmark records
// ============================================================================

#[test]
fn test_landmark_text_keeps_commas() {
    let input = "* x,y,label\n18.43,-34.10,Muizenberg, Surfer's Corner\n";
    let landmarks: Vec<Landmark> = parse_records(Cursor::new(input), "memory").unwrap();
    assert_eq!(landmarks, vec![Landmark::new(18.43, -34.10, "Muizenberg, Surfer's Corner")]);
}

#[test]
fn test_false_bay_landmarks_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_text_file(dir.path(), "Falsebay_landmarks.txt", fixtures::LANDMARKS_FALSE_BAY);

    let landmarks: Vec<Landmark> = read_records(&path).unwrap();
    assert_eq!(landmarks.len(), 3);
    assert_eq!(landmarks[0].display_text(), "-Cape Point");
    assert_eq!(landmarks[2].text, "Muizenberg, Surfer's Corner");
}

#[test]
fn test_landmark_file_with_only_comments() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_text_file(dir.path(), "landmarks.txt", fixtures::LANDMARKS_EMPTY);

    let landmarks: Vec<Landmark> = read_records(&path).unwrap();
    assert!(landmarks.is_empty());
}

#[test]
fn test_landmark_missing_text() {
    let err = parse_records::<Landmark, _>(Cursor::new("18.43,-34.10\n"), "memory").unwrap_err();
    assert!(matches!(err, BathyError::MalformedRow { line: 1, .. }));
}

// ============================================================================
// File errors
// ============================================================================

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_records::<Sample>(dir.path().join("absent.dat")).unwrap_err();
    assert!(matches!(err, BathyError::FileNotFound { .. }));
}
