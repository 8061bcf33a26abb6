pub mod profiles;

pub use profiles::{ProfileStore, UserRecord, UserStats, STORE_FILE};
