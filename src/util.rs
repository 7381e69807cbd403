use log::{Level, Log, Metadata, Record};

/// Writes log records to stderr, keeping stdout free for query output.
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        match record.level() {
            Level::Error | Level::Warn => {
                eprintln!("[{}] {}: {}", record.level(), record.target(), record.args())
            }
            _ => eprintln!("[{}] {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {}
}
