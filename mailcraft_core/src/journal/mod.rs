mod event;
mod record;

pub use event::{BuilderEvent, EventMetadata};
pub use record::{EventJournal, JournalRecord};

#[cfg(test)]
mod tests;
