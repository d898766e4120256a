pub mod model;
pub mod scan;

// Re-export commonly used types/functions for consumers
pub use model::{load_config, load_raw_bin};
pub use scan::{disassemble_function, scan_range, FunctionReport, Line, ScanOptions, ScanReport, SwitchOut};
