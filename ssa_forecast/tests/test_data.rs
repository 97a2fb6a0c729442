use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use ssa_forecast::data::{DataLoader, LoaderOptions, Observation, TimeSeriesBuffer};
use ssa_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
}

fn create_test_buffer(len: usize) -> TimeSeriesBuffer {
    let values: Vec<f64> = (0..len).map(|i| (i * i) as f64).collect();
    TimeSeriesBuffer::from_values(day(1), &values).unwrap()
}

#[test]
fn test_load_valid_observations() {
    let observations = vec![
        Observation::new(day(1), 1.0),
        Observation::new(day(2), 3.0),
        Observation::new(day(3), 7.0),
    ];
    let buffer = TimeSeriesBuffer::load(observations).unwrap();

    assert_eq!(buffer.len(), 3);
    assert!(!buffer.is_empty());
    assert_eq!(buffer.values(), &[1.0, 3.0, 7.0]);
    assert_eq!(buffer.first_date(), Some(day(1)));
    assert_eq!(buffer.last_date(), Some(day(3)));
}

#[test]
fn test_load_rejects_unsorted_dates() {
    let observations = vec![
        Observation::new(day(2), 1.0),
        Observation::new(day(1), 2.0),
    ];
    let err = TimeSeriesBuffer::load(observations).unwrap_err();
    assert!(matches!(err, ForecastError::ValidationError(_)));
}

#[test]
fn test_load_rejects_duplicate_dates() {
    let observations = vec![
        Observation::new(day(1), 1.0),
        Observation::new(day(1), 2.0),
    ];
    assert!(matches!(
        TimeSeriesBuffer::load(observations),
        Err(ForecastError::ValidationError(_))
    ));
}

#[test]
fn test_load_rejects_gaps() {
    let observations = vec![
        Observation::new(day(1), 1.0),
        Observation::new(day(3), 2.0),
    ];
    let err = TimeSeriesBuffer::load(observations).unwrap_err();
    assert!(err.to_string().contains("Gap"));
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[case(f64::NEG_INFINITY)]
fn test_load_rejects_non_finite(#[case] bad: f64) {
    let observations = vec![Observation::new(day(1), 1.0), Observation::new(day(2), bad)];
    assert!(matches!(
        TimeSeriesBuffer::load(observations),
        Err(ForecastError::ValidationError(_))
    ));
}

#[test]
fn test_load_rejects_empty() {
    assert!(TimeSeriesBuffer::load(Vec::new()).is_err());
}

#[test]
fn test_split_cuts_by_index() {
    let buffer = create_test_buffer(10);
    let (train, test) = buffer.split(0.8).unwrap();

    assert_eq!(train.len(), 8);
    assert_eq!(test.len(), 2);
    assert_eq!(train.start(), 0);
    assert_eq!(test.start(), 8);
    assert_eq!(test.values(), &[64.0, 81.0]);
    assert_eq!(test.first_date(), Some(day(9)));
}

#[test]
fn test_split_floors_the_cut() {
    let buffer = create_test_buffer(7);
    let (train, test) = buffer.split(0.5).unwrap();
    assert_eq!(train.len(), 3);
    assert_eq!(test.len(), 4);
}

#[test]
fn test_split_ignores_value_order() {
    // A series that drops after the cut point still splits by position.
    let values = [5.0, 9.0, 12.0, 2.0, 1.0];
    let buffer = TimeSeriesBuffer::from_values(day(1), &values).unwrap();
    let (train, test) = buffer.split(0.6).unwrap();
    assert_eq!(train.values(), &[5.0, 9.0, 12.0]);
    assert_eq!(test.values(), &[2.0, 1.0]);
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(-0.2)]
#[case(0.05)]
fn test_split_rejects_degenerate_fractions(#[case] fraction: f64) {
    let buffer = create_test_buffer(10);
    assert!(matches!(
        buffer.split(fraction),
        Err(ForecastError::ValidationError(_))
    ));
}

#[test]
fn test_views_share_the_buffer() {
    let buffer = create_test_buffer(12);
    let (train, test) = buffer.split(0.75).unwrap();

    assert!(std::ptr::eq(train.values().as_ptr(), buffer.values().as_ptr()));
    assert!(std::ptr::eq(
        test.values().as_ptr(),
        buffer.values()[9..].as_ptr()
    ));
}

#[test]
fn test_slice_and_tail() {
    let buffer = create_test_buffer(10);
    let view = buffer.slice(2..6).unwrap();
    assert_eq!(view.values(), &[4.0, 9.0, 16.0, 25.0]);

    let inner = view.slice(1..3).unwrap();
    assert_eq!(inner.values(), &[9.0, 16.0]);
    assert_eq!(inner.start(), 3);

    assert_eq!(view.tail(2).values(), &[16.0, 25.0]);
    assert_eq!(view.tail(100).len(), 4);

    assert!(buffer.slice(5..11).is_err());
    assert!(view.slice(0..5).is_err());
}

#[test]
fn test_view_observations() {
    let buffer = create_test_buffer(4);
    let collected: Vec<Observation> = buffer.slice(1..3).unwrap().observations().collect();
    assert_eq!(
        collected,
        vec![Observation::new(day(2), 1.0), Observation::new(day(3), 4.0)]
    );
}

#[test]
fn test_data_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,TotalConfirmed,TotalDeaths").unwrap();
    writeln!(file, "2020-01-22,555,17").unwrap();
    writeln!(file, "2020-01-23,654,18").unwrap();
    writeln!(file, "2020-01-24,941,26").unwrap();

    let buffer = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.values(), &[555.0, 654.0, 941.0]);
    assert_eq!(buffer.first_date(), NaiveDate::from_ymd_opt(2020, 1, 22));
}

#[test]
fn test_data_loader_custom_columns() {
    let csv = "day;cases\n03/01/2020;10\n03/02/2020;12\n";
    let options = LoaderOptions {
        date_column: "day".to_string(),
        value_column: "cases".to_string(),
        date_format: "%m/%d/%Y".to_string(),
    };

    // Semicolons are not the delimiter, so the header is one column.
    assert!(DataLoader::from_reader(csv.as_bytes(), &options).is_err());

    let csv = csv.replace(';', ",");
    let buffer = DataLoader::from_reader(csv.as_bytes(), &options).unwrap();
    assert_eq!(buffer.values(), &[10.0, 12.0]);
    assert_eq!(buffer.first_date(), Some(day(1)));
}

#[test]
fn test_data_loader_error_handling() {
    let result = DataLoader::from_csv("nonexistent_file.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    let missing_column = "Date,Deaths\n2020-01-22,1\n";
    let result = DataLoader::from_reader(missing_column.as_bytes(), &LoaderOptions::default());
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));

    let bad_date = "Date,TotalConfirmed\n22/01/2020,1\n";
    let result = DataLoader::from_reader(bad_date.as_bytes(), &LoaderOptions::default());
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));

    let bad_value = "Date,TotalConfirmed\n2020-01-22,many\n";
    let result = DataLoader::from_reader(bad_value.as_bytes(), &LoaderOptions::default());
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));

    let gap = "Date,TotalConfirmed\n2020-01-22,1\n2020-01-24,2\n";
    let result = DataLoader::from_reader(gap.as_bytes(), &LoaderOptions::default());
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}
