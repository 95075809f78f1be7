pub mod alert_cmd;
pub mod budget_cmd;
pub mod config_cmd;
pub mod costs_cmd;
pub mod dashboard_cmd;
pub mod optimize_cmd;
pub mod output;
pub mod renderer;
pub mod selector;
