use math_score::app::pipeline::predict_batch;
use math_score::artifacts::ArtifactPaths;
use math_score::io::{SCORE_COLUMN, read_records_csv, write_predictions_csv};
use math_score::service::PredictionService;

#[test]
fn csv_in_predictions_out() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let input = tmp.path().join("students.csv");
    std::fs::write(
        &input,
        "gender,race_ethnicity,parental_level_of_education,lunch,test_preparation_course,reading_score,writing_score\n\
         female,group B,bachelor's degree,standard,none,70,65\n\
         male,group Z,high school,standard,none,60,60\n\
         male,group C,some college,free/reduced,completed,88,90\n",
    )
    .unwrap();

    let ingested = read_records_csv(&input).unwrap();
    assert_eq!(ingested.rows_read, 3);
    assert_eq!(ingested.records.len(), 2);
    assert_eq!(ingested.row_errors[0].line, 3);

    let artifacts = ArtifactPaths::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts"));
    let service = PredictionService::load(&artifacts).unwrap();
    let scores = predict_batch(&service, &ingested.records).unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|s| s.is_finite()));

    let output = tmp.path().join("out.csv");
    write_predictions_csv(&output, &ingested.records, &scores).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.lines().next().unwrap().ends_with(SCORE_COLUMN));
    assert_eq!(text.lines().count(), 3);
}
