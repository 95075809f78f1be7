pub mod alert;
pub mod budget;
pub mod cost;
pub mod optimization;
pub mod status;
