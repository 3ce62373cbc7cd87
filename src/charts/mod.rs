//! Charts module - chart catalog and HTML rendering

mod renderer;
mod spec;

pub use renderer::{HtmlRenderer, RenderError};
pub use spec::{dashboard_charts, ChartSpec, RangeMode, Trace, TraceKind, YAxis};
