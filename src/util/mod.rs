pub mod env;
pub mod logging;
pub mod macros;
pub mod random;
pub mod traits;
