pub mod registry;
pub mod traits;

// Rate source implementations
pub mod fallback;
pub mod tcmb;
