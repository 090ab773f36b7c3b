pub mod cash_flow;
pub mod home_equity;
