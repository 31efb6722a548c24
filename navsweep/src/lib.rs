// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{EXIT_CHECK_FAILURES, exit_code, load_config_from_args, parse_start_url};

// Re-export report helpers from navsweep-core
pub use navsweep_core::report::{ReportFormat, extract_url_path, render_report};
