pub mod arrange;
pub mod log_panel;
pub mod options;

pub use arrange::{ArrangeState, open_document, show_arrange};
pub use log_panel::show_log_panel;
pub use options::{OptionsAction, show_options};
