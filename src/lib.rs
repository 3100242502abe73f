pub mod bench;
pub mod database;
pub mod global;
pub mod util;
