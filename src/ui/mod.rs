pub mod icons;
pub mod progress;
pub mod render;

pub use progress::RequestSpinner;
pub use render::{print_notification, print_project, print_project_table};
