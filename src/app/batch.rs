use crate::core::predictor::Predictor;
use crate::core::{Result, Storage, StudentRecord};
use std::io::{Read, Write};

pub const SCORE_COLUMN: &str = "predicted average score";

pub fn read_records<R: Read>(reader: R) -> Result<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records: Vec<StudentRecord> = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

pub fn write_predictions<W: Write>(
    writer: W,
    records: &[StudentRecord],
    scores: &[f64],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = StudentRecord::COLUMNS.to_vec();
    header.push(SCORE_COLUMN);
    writer.write_record(&header)?;

    for (record, score) in records.iter().zip(scores) {
        let score = format!("{:.2}", score);
        writer.write_record([
            record.gender.label(),
            record.race_ethnicity.label(),
            record.parental_education.label(),
            record.lunch.label(),
            record.test_preparation.label(),
            score.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Scores every row of `input`. Writes to `output` through storage, or to
/// `stdout` when no output path is given. Returns the number of rows scored.
pub async fn run_batch<S: Storage, W: Write>(
    predictor: &Predictor,
    storage: &S,
    input: &str,
    output: Option<&str>,
    stdout: W,
) -> Result<usize> {
    let data = storage.read_file(input).await?;
    let records = read_records(data.as_slice())?;
    tracing::info!("Read {} records from {}", records.len(), input);

    let scores = predictor.predict_batch(&records)?;

    match output {
        Some(path) => {
            let mut buffer = Vec::new();
            write_predictions(&mut buffer, &records, &scores)?;
            storage.write_file(path, &buffer).await?;
            tracing::info!("Wrote {} predictions to {}", scores.len(), path);
        }
        None => write_predictions(stdout, &records, &scores)?,
    }

    Ok(records.len())
}
