// tentcard-pdf: tent-card name plate layout and auto-fit sizing
//
// The engine is pure: every function takes a configuration snapshot and a
// name list and returns fresh measurements. `render` and `store` are the
// IO-facing hosts around it.

pub mod error;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod names;
pub mod plan;
pub mod render;
pub mod sizing;
pub mod store;
pub mod units;

pub use error::{AppError, Result};
pub use layout::{paginate, Page, PaperDimensions};
pub use metrics::{resolve_fit_scale, BuiltinMetrics, FontStyle, TextMetrics};
pub use model::{AppConfig, BorderStyle, NameEntry, Orientation, PaperSize, SavedNameplate};
pub use names::{parse_bulk_text, to_bulk_text, NameList};
pub use sizing::{compute_font_sizes, layout_card, FontSizes};
