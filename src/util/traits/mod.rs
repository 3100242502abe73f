pub mod option;

pub use option::OptionExt;
