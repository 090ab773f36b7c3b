pub mod drawdown;
pub mod sensitivity;
