//! Library crate for scan-pivot: turns nested port-scan results into per-port tables.
pub mod icon;
pub mod names;
pub mod pivot;
pub mod render;
pub mod report;
pub mod server;
pub mod types;

pub use pivot::PivotTableBuilder;
pub use report::ScanReport;
pub use types::{Cell, Icon, PortTable};
