use crate::models::Record;

/// Replaces the built-in delivery path when installed on a collector.
pub trait ICustomReporter: Send + Sync {
    fn report(&self, record: &Record);
}

impl<F> ICustomReporter for F
where
    F: Fn(&Record) + Send + Sync,
{
    fn report(&self, record: &Record) {
        self(record)
    }
}
