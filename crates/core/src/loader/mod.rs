pub mod dates;
pub mod traits;

// Source implementations
pub mod csv_source;
pub mod memory;
