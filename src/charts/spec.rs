//! Chart Catalog Module
//! Declarative descriptions of the dashboard figures: which table columns
//! feed which traces, and how each figure is laid out.

use serde_json::{json, Value};

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Bar,
    Scatter,
}

/// Which vertical axis a trace is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    Primary,
    Secondary,
}

/// Plotly rangemode for a vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    NonNegative,
    ToZero,
}

impl RangeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeMode::NonNegative => "nonnegative",
            RangeMode::ToZero => "tozero",
        }
    }
}

/// One plotted series, read from a named table column.
#[derive(Debug, Clone)]
pub struct Trace {
    pub column: &'static str,
    pub name: Option<&'static str>,
    pub kind: TraceKind,
    pub color: Option<&'static str>,
    pub dotted: bool,
    pub axis: YAxis,
}

impl Trace {
    pub fn bar(column: &'static str) -> Self {
        Self {
            column,
            name: None,
            kind: TraceKind::Bar,
            color: None,
            dotted: false,
            axis: YAxis::Primary,
        }
    }

    pub fn line(column: &'static str) -> Self {
        Self {
            kind: TraceKind::Scatter,
            ..Self::bar(column)
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    pub fn dotted(mut self) -> Self {
        self.dotted = true;
        self
    }

    pub fn on_secondary(mut self) -> Self {
        self.axis = YAxis::Secondary;
        self
    }
}

/// A complete dashboard figure.
///
/// Charts without a fixed `x_start` get the 1m/3m/6m/all range selector;
/// charts with one clamp the x axis to start there.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub range_slider: bool,
    pub x_start: Option<&'static str>,
    pub y_rangemode: Option<RangeMode>,
    pub y2_rangemode: Option<RangeMode>,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    fn new(id: &'static str, title: &'static str, traces: Vec<Trace>) -> Self {
        Self {
            id,
            title,
            range_slider: false,
            x_start: None,
            y_rangemode: None,
            y2_rangemode: None,
            traces,
        }
    }

    pub fn has_secondary_axis(&self) -> bool {
        self.traces.iter().any(|t| t.axis == YAxis::Secondary)
    }
}

/// Ratio charts start here; the feed reports `casi_testati` only from
/// late April 2020.
const RATIO_CHARTS_X_START: &str = "2020-04-22";

/// Plotly config shared by every chart.
pub fn chart_config() -> Value {
    json!({
        "displaylogo": false,
        "displayModeBar": false,
        "responsive": true,
    })
}

/// Range-selector buttons: 1m / 3m / 6m backward plus the full range.
pub fn slider_buttons() -> Value {
    json!([
        { "count": 1, "label": "1m", "step": "month", "stepmode": "backward" },
        { "count": 3, "label": "3m", "step": "month", "stepmode": "backward" },
        { "count": 6, "label": "6m", "step": "month", "stepmode": "backward" },
        { "step": "all" },
    ])
}

/// The fixed dashboard layout, top to bottom.
pub fn dashboard_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec::new(
            "nuovi_positivi",
            "Nuovi Casi",
            vec![Trace::bar("nuovi_positivi").named("Casi totali")],
        ),
        ChartSpec::new(
            "casi-totali",
            "Totale Casi",
            vec![Trace::bar("totale_casi").named("Casi totali")],
        ),
        ChartSpec::new(
            "isolamento-domiciliare",
            "Isolamento domiciliare",
            vec![Trace::bar("isolamento_domiciliare").color("grey")],
        ),
        ChartSpec::new(
            "terapia-intensiva",
            "Terapia intensiva",
            vec![
                Trace::bar("terapia_intensiva")
                    .named("Terapia Intensiva")
                    .color("RebeccaPurple"),
                Trace::line("terapia_intensiva_avg")
                    .named("Media 7 giorni")
                    .color("blue"),
            ],
        ),
        ChartSpec::new(
            "nuovi-casi-norm",
            "Nuovi casi normalizzati",
            vec![
                Trace::bar("nuovi_casi_norm")
                    .named("Nuovi casi norm.")
                    .color("DarkOliveGreen"),
                Trace::line("nuovi_casi_norm_avg").named("Media 7gg"),
            ],
        ),
        ChartSpec::new(
            "totale-ospedalizzati",
            "Terapia intensiva e Ospedalizzati",
            vec![
                Trace::bar("totale_ospedalizzati")
                    .named("Totale ospedalizzati")
                    .color("DarkCyan"),
                Trace::line("totale_ospedalizzati_avg")
                    .named("Media 7 giorni")
                    .color("blue")
                    .dotted(),
            ],
        ),
        ChartSpec {
            x_start: Some(RATIO_CHARTS_X_START),
            y_rangemode: Some(RangeMode::NonNegative),
            y2_rangemode: Some(RangeMode::NonNegative),
            ..ChartSpec::new(
                "rapporto-positivi-tamponi",
                "Media 7gg: Decessi giorn. vs. Contagi giorn.",
                vec![
                    Trace::line("nuovi_positivi")
                        .named("Nuovi casi")
                        .color("orange")
                        .dotted(),
                    Trace::line("nuovi_decessi")
                        .named("Decessi giornalieri")
                        .color("blue")
                        .dotted()
                        .on_secondary(),
                    Trace::line("nuovi_positivi_avg")
                        .named("Nuovi casi (media 7 giorni)")
                        .color("orange"),
                    Trace::line("nuovi_decessi_avg")
                        .named("Nuovi decessi (media 7 giorni)")
                        .color("blue")
                        .on_secondary(),
                ],
            )
        },
        ChartSpec {
            x_start: Some(RATIO_CHARTS_X_START),
            y_rangemode: Some(RangeMode::NonNegative),
            y2_rangemode: Some(RangeMode::NonNegative),
            ..ChartSpec::new(
                "rapporto-pos-tamponi",
                "(%) Nuovi Positivi / Casi Testati con tamponi",
                vec![
                    Trace::line("rapp_casi_test")
                        .named("% Casi testati")
                        .color("orange")
                        .dotted(),
                    Trace::line("perc_tamponi_meno_testati")
                        .named("% Tamponi totali - Casi testati")
                        .color("blue")
                        .dotted()
                        .on_secondary(),
                    Trace::line("rolling_tested")
                        .named("Media (% casi testati)")
                        .color("orange"),
                    Trace::line("rolling_swabs_tested")
                        .named("Media (% tamp totali - casi testati)")
                        .color("blue")
                        .on_secondary(),
                ],
            )
        },
        ChartSpec {
            range_slider: true,
            y_rangemode: Some(RangeMode::NonNegative),
            y2_rangemode: Some(RangeMode::ToZero),
            ..ChartSpec::new(
                "nuovi-casi-vs-morti",
                "Nuovi casi vs decessi",
                vec![
                    Trace::bar("nuovi_decessi")
                        .named("Nuovi decessi")
                        .color("orange"),
                    Trace::line("nuovi_positivi")
                        .named("Nuovi casi")
                        .color("blue")
                        .on_secondary(),
                ],
            )
        },
    ]
}
