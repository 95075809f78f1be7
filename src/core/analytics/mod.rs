pub mod aggregate;
pub mod forecast;
pub mod threshold;
