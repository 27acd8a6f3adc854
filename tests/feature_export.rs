use std::fs::File;
use std::path::PathBuf;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::RowAccessor;

use futbr_predictor::feature_export::write_training_table;
use futbr_predictor::features::{FeatureVector, TrainingRow, TrainingTable};

fn sample_vector(seed: i64) -> FeatureVector {
    FeatureVector {
        form_goals_for_home: 1.5 + seed as f64,
        form_goals_against_home: 0.5,
        form_points_home: 2.0,
        form_goals_for_away: 1.0,
        form_goals_against_away: 1.25,
        form_points_away: 1.2,
        is_derby: seed % 2,
        home_def: 4,
        home_mid: 3,
        home_att: 3,
        away_def: 3,
        away_mid: 5,
        away_att: 2,
        diff_def: 1,
        diff_mid: -2,
        diff_att: 1,
    }
}

fn temp_out(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("futbr_{}_{}.parquet", name, std::process::id()));
    path
}

#[test]
fn written_table_reads_back_with_identical_values() {
    let table = TrainingTable {
        rows: (0..3)
            .map(|seed| TrainingRow {
                features: sample_vector(seed),
                target: (seed % 3) as u8,
            })
            .collect(),
        eligible: 5,
        dropped: 2,
    };

    let path = temp_out("roundtrip");
    write_training_table(&path, &table).unwrap();

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    let metadata = reader.metadata().file_metadata();
    assert_eq!(metadata.num_rows(), 3);

    let schema = metadata.schema_descr();
    assert_eq!(schema.num_columns(), 17);
    assert_eq!(schema.column(0).name(), "form_goals_for_home");
    assert_eq!(schema.column(6).name(), "is_derby");
    assert_eq!(schema.column(16).name(), "target");

    let rows: Vec<_> = reader
        .get_row_iter(None)
        .unwrap()
        .map(|row| row.unwrap())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get_double(0).unwrap(), 1.5);
    assert_eq!(rows[1].get_double(0).unwrap(), 2.5);
    assert_eq!(rows[1].get_long(6).unwrap(), 1);
    assert_eq!(rows[2].get_long(14).unwrap(), -2);
    assert_eq!(rows[2].get_long(16).unwrap(), 2);

    std::fs::remove_file(&path).ok();
}

#[test]
fn empty_table_writes_a_valid_file() {
    let table = TrainingTable {
        rows: Vec::new(),
        eligible: 0,
        dropped: 0,
    };
    let path = temp_out("empty");
    write_training_table(&path, &table).unwrap();

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(reader.metadata().file_metadata().num_rows(), 0);
    std::fs::remove_file(&path).ok();
}
