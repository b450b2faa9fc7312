use rand::rngs::StdRng;
use rand::SeedableRng;
use xyplot::data::{read_data, Delimiter, PlotType, ReadOptions};
use xyplot::directives::Limits;
use xyplot::error::PlotError;
use xyplot::report::SeriesSummary;
use xyplot::DataSet;

fn opts(plot_type: PlotType) -> ReadOptions {
    ReadOptions {
        plot_type,
        delimiter: Delimiter::Tab,
        xlim: Limits::default(),
        jitter: (0.0, 0.0),
    }
}

fn read(text: &str, opts: &ReadOptions) -> Result<DataSet, PlotError> {
    let mut rng = StdRng::seed_from_u64(42);
    read_data(text.as_bytes(), "test", opts, &mut rng)
}

#[test]
fn xy_rows_skip_comments() {
    let ds = read("# header\n1\t2\n3\t4\n# trailing\n5\t6\n", &opts(PlotType::Xy)).unwrap();
    assert_eq!(ds.x, vec![1.0, 3.0, 5.0]);
    assert_eq!(ds.y, vec![2.0, 4.0, 6.0]);
    assert!(ds.y2.is_empty() && ds.err.is_empty() && ds.band.is_empty());
}

#[test]
fn y_type_indexes_rows_from_zero() {
    let ds = read("7\n8\n9\n", &opts(PlotType::Y)).unwrap();
    assert_eq!(ds.x, vec![0.0, 1.0, 2.0]);
    assert_eq!(ds.y, vec![7.0, 8.0, 9.0]);
}

#[test]
fn y_type_counts_kept_rows() {
    let mut o = opts(PlotType::Y);
    o.xlim = Limits { lo: Some(1.0), hi: None };
    // row 0 gets index 0 and is dropped, so index 0 is offered again
    let ds = read("7\n8\n9\n", &o).unwrap();
    assert!(ds.x.is_empty());
    assert!(ds.y.is_empty());
}

#[test]
fn xr_filter_keeps_error_bars_aligned() {
    let mut o = opts(PlotType::Xyci);
    o.xlim = Limits { lo: Some(2.0), hi: Some(3.0) };
    let text = "1\t10\t9\t11\n2\t20\t18\t23\n3\t30\t25\t31\n4\t40\t39\t41\n";
    let ds = read(text, &o).unwrap();
    assert_eq!(ds.x, vec![2.0, 3.0]);
    assert_eq!(ds.y, vec![20.0, 30.0]);
    assert_eq!(ds.err, vec![(2.0, 3.0), (5.0, 1.0)]);
}

#[test]
fn band_types_ignore_the_row_filter() {
    let mut o = opts(PlotType::XymM);
    o.xlim = Limits { lo: Some(100.0), hi: None };
    let ds = read("1\t2\t1\t3\n2\t3\t2\t4\n", &o).unwrap();
    assert_eq!(ds.x, vec![1.0, 2.0]);
    assert_eq!(ds.band, vec![(1.0, 3.0), (2.0, 4.0)]);
}

#[test]
fn xmmy_collects_every_extra_column() {
    let ds = read("0\t1\t5\t2\t3\t4\n1\t2\t6\t3\t4\t5\n", &opts(PlotType::XmMy)).unwrap();
    assert_eq!(ds.x, vec![0.0, 1.0]);
    assert_eq!(ds.band, vec![(1.0, 5.0), (2.0, 6.0)]);
    assert_eq!(ds.curves, vec![vec![2.0, 3.0], vec![3.0, 4.0], vec![4.0, 5.0]]);
    assert!(ds.y.is_empty());
}

#[test]
fn xmmy_rejects_ragged_rows() {
    let err = read("0\t1\t5\t2\n1\t2\t6\t3\t4\n", &opts(PlotType::XmMy)).unwrap_err();
    assert!(matches!(err, PlotError::RaggedRow { line: 2, expected: 4, found: 5, .. }), "{err}");
}

#[test]
fn auxiliary_columns_land_in_their_vectors() {
    let ds = read("1\t2\t30\n2\t3\t40\n", &opts(PlotType::Xys)).unwrap();
    assert_eq!(ds.size, vec![30.0, 40.0]);
    let ds = read("1\t2\t0.5\n", &opts(PlotType::Xyy)).unwrap();
    assert_eq!(ds.y2, vec![0.5]);
    let ds = read("1\t2\tred\n2\t3\t#00ff00\n", &opts(PlotType::Xyc)).unwrap();
    assert_eq!(ds.color, vec!["red".to_string(), "#00ff00".to_string()]);
}

#[test]
fn short_rows_report_line_and_width() {
    let err = read("1\t2\n3\n", &opts(PlotType::Xy)).unwrap_err();
    assert!(
        matches!(err, PlotError::MissingColumn { line: 2, expected: 2, found: 1, .. }),
        "{err}"
    );
}

#[test]
fn non_numeric_fields_are_errors() {
    let err = read("1\tabc\n", &opts(PlotType::Xy)).unwrap_err();
    match err {
        PlotError::BadNumber { line, column, value, .. } => {
            assert_eq!((line, column, value.as_str()), (1, 2, "abc"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn whitespace_and_custom_delimiters() {
    let mut o = opts(PlotType::Xy);
    o.delimiter = Delimiter::Whitespace;
    let ds = read("1   2\n  3\t 4\n\n", &o).unwrap();
    assert_eq!(ds.points(), vec![(1.0, 2.0), (3.0, 4.0)]);

    o.delimiter = ",".parse().unwrap();
    let ds = read("1,2\n3,4\n", &o).unwrap();
    assert_eq!(ds.points(), vec![(1.0, 2.0), (3.0, 4.0)]);
}

#[test]
fn jitter_moves_points_within_the_width() {
    let mut o = opts(PlotType::Xy);
    o.jitter = (0.5, 0.0);
    let ds = read("1\t2\n3\t4\n", &o).unwrap();
    assert_eq!(ds.y, vec![2.0, 4.0]);
    for (j, x) in ds.x.iter().zip([1.0, 3.0]) {
        assert!((j - x).abs() <= 0.25);
    }
}

#[test]
fn density_reads_a_single_column() {
    let ds = read("1.5\n2.5\n", &opts(PlotType::Density)).unwrap();
    assert_eq!(ds.x, vec![1.5, 2.5]);
    assert_eq!(ds.len(), 2);
}

#[test]
fn unknown_type_names_are_rejected() {
    assert!("xyz".parse::<PlotType>().is_err());
    assert_eq!("xmMy".parse::<PlotType>().unwrap(), PlotType::XmMy);
    assert_eq!(PlotType::XymM.as_str(), "xymM");
}

#[test]
fn summary_ignores_non_finite_values() {
    let ds = DataSet {
        source: "t".into(),
        x: vec![0.0, 1.0, 2.0],
        y: vec![1.0, f64::NAN, 3.0],
        ..Default::default()
    };
    let s = SeriesSummary::of(&ds, PlotType::Xy);
    assert_eq!(s.points, 3);
    assert_eq!(s.y_range, Some((1.0, 3.0)));
    assert_eq!(s.y_mean, Some(2.0));
}
