use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use parquet::data_type::{DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use crate::features::TrainingTable;

// Column order here is the model compatibility contract: the six rolling
// form averages, the ten context fields, then the target class.
const TRAINING_SCHEMA: &str = "
    message training_features {
        required double form_goals_for_home;
        required double form_goals_against_home;
        required double form_points_home;
        required double form_goals_for_away;
        required double form_goals_against_away;
        required double form_points_away;
        required int64 is_derby;
        required int64 home_def;
        required int64 home_mid;
        required int64 home_att;
        required int64 away_def;
        required int64 away_mid;
        required int64 away_att;
        required int64 diff_def;
        required int64 diff_mid;
        required int64 diff_att;
        required int64 target;
    }
";

const DOUBLE_COLUMNS: usize = 6;

/// Writes the assembled training table as a Parquet file with the 16 feature
/// columns plus `target`. Dropped rows were already excluded upstream, so
/// every cell is present (no nulls).
pub fn write_training_table(path: &Path, table: &TrainingTable) -> Result<()> {
    let schema =
        Arc::new(parse_message_type(TRAINING_SCHEMA).context("parse training table schema")?);
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path)
        .with_context(|| format!("create training table file {}", path.display()))?;
    let mut writer = SerializedFileWriter::new(file, schema, props)
        .context("open parquet writer for training table")?;

    let mut double_columns: [Vec<f64>; DOUBLE_COLUMNS] = Default::default();
    let mut int_columns: [Vec<i64>; 11] = Default::default();
    for row in &table.rows {
        let f = &row.features;
        double_columns[0].push(f.form_goals_for_home);
        double_columns[1].push(f.form_goals_against_home);
        double_columns[2].push(f.form_points_home);
        double_columns[3].push(f.form_goals_for_away);
        double_columns[4].push(f.form_goals_against_away);
        double_columns[5].push(f.form_points_away);
        int_columns[0].push(f.is_derby);
        int_columns[1].push(f.home_def);
        int_columns[2].push(f.home_mid);
        int_columns[3].push(f.home_att);
        int_columns[4].push(f.away_def);
        int_columns[5].push(f.away_mid);
        int_columns[6].push(f.away_att);
        int_columns[7].push(f.diff_def);
        int_columns[8].push(f.diff_mid);
        int_columns[9].push(f.diff_att);
        int_columns[10].push(i64::from(row.target));
    }

    let mut row_group = writer.next_row_group().context("open parquet row group")?;
    let mut column_idx = 0usize;
    while let Some(mut column) = row_group.next_column().context("open parquet column")? {
        if column_idx < DOUBLE_COLUMNS {
            column
                .typed::<DoubleType>()
                .write_batch(&double_columns[column_idx], None, None)
                .context("write double feature column")?;
        } else {
            column
                .typed::<Int64Type>()
                .write_batch(&int_columns[column_idx - DOUBLE_COLUMNS], None, None)
                .context("write int64 feature column")?;
        }
        column.close().context("close parquet column")?;
        column_idx += 1;
    }
    row_group.close().context("close parquet row group")?;
    writer.close().context("close parquet writer")?;
    Ok(())
}
