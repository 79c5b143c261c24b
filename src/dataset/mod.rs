mod load;
mod parse;
mod record;

pub use load::{DEFAULT_MIN_MEMBERS, LoaderConfig, load_dataset};
pub use record::{AnimeRecord, Era, EraBuckets};

#[cfg(test)]
pub(crate) use record::sample_record;
