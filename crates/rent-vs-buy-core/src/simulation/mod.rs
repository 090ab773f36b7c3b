pub mod aggregate;
pub mod engine;
pub mod params;
pub mod session;
