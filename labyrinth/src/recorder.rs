//! Recorder writing training progress to the log.
use labyrinth_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::{info, trace};

/// Writes per-step records at trace level and flushed aggregates at info level.
#[derive(Default)]
pub struct LoggingRecorder {
    storage: RecordStorage,
    last_flushed: Option<Record>,
}

impl LoggingRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate written by the latest flush.
    pub fn last_flushed(&self) -> Option<&Record> {
        self.last_flushed.as_ref()
    }
}

// Keys sorted, scalars with four decimals, timestamps dropped.
fn format_record(record: &Record) -> String {
    let mut items: Vec<_> = record
        .iter()
        .filter_map(|(k, v)| match v {
            RecordValue::Scalar(v) => Some(format!("{}={:.4}", k, v)),
            RecordValue::String(s) => Some(format!("{}={}", k, s)),
            RecordValue::DateTime(_) => None,
        })
        .collect();
    items.sort();
    items.join(", ")
}

impl Recorder for LoggingRecorder {
    fn write(&mut self, record: Record) {
        trace!("{}", format_record(&record));
    }
}

impl AggregateRecorder for LoggingRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        info!("[{}] {}", step, format_record(&record));
        self.last_flushed = Some(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        let mut record = Record::from_scalar("loss", 0.5);
        record.insert("episode", RecordValue::Scalar(3.0));
        record.insert("phase", RecordValue::String("train".to_string()));
        assert_eq!(
            format_record(&record),
            "episode=3.0000, loss=0.5000, phase=train"
        );
    }

    #[test]
    fn test_flush_aggregates_stored_records() {
        let mut recorder = LoggingRecorder::new();
        recorder.flush(0);
        assert!(recorder.last_flushed().is_none());

        for v in [2.0, 4.0] {
            recorder.store(Record::from_scalar("episode_steps", v));
        }
        recorder.flush(2);
        let record = recorder.last_flushed().unwrap();
        assert_eq!(record.get_scalar("episode_steps_mean").unwrap(), 3.0);
    }
}
