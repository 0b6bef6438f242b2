pub mod audit;
pub mod caller;
