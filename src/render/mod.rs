//! Terminal rendering of fleet status, bot details, log lines and config
//! fields. Pure functions from core state to text; stdout handling lives in
//! main.

pub mod text;

pub use text::{
    config_changes, config_form, connection_line, detail_card, field_detail, fleet_table,
    log_pane,
};
