use std::error::Error;
use std::io;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::config::constant::METERS_PER_KILOMETER;
use crate::solver::memory::RecordEvent;

/// Write the record history as CSV to `path`.
pub fn save_records_csv(records: &[RecordEvent], path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let wtr = Writer::from_path(path.as_ref())?;
    write_records(records, wtr)?;
    info!("Wrote {} record events to {}", records.len(), path.as_ref().display());
    Ok(())
}

fn write_records<W: io::Write>(records: &[RecordEvent], mut wtr: Writer<W>) -> Result<(), Box<dyn Error>> {
    wtr.write_record(["run", "total_distance_km", "previous_distance_km", "recorded_at"])?;
    for event in records {
        wtr.write_record([
            event.run.to_string(),
            format!("{:.3}", event.total_distance / METERS_PER_KILOMETER),
            format!("{:.3}", event.previous_distance / METERS_PER_KILOMETER),
            event.at.to_rfc3339(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
