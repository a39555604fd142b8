pub mod blog;
pub mod clock;
pub mod config;
pub mod entry;
pub mod record;
pub mod render;
pub mod store;

#[cfg(test)]
mod tests;

pub use blog::Blog;
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use entry::{Entry, EntryId};
pub use render::TimestampFormat;
pub use store::{FileStore, KeyValueStore, MemoryStore};
