pub mod parameters;
pub mod schedule;
pub mod sensitivity;
pub mod simulate;
