//! HTML Renderer Module
//! Builds plotly figure JSON from the chart catalog and assembles the
//! dashboard page served to the browser.

use polars::prelude::*;
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::spec::{self, ChartSpec, Trace, TraceKind, YAxis};
use crate::data::{Snapshot, DATE_COLUMN};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-basic-latest.min.js";
const PAGE_TITLE: &str = "Dashboard Italia";
const VIEWPORT: &str = "width=device-width, initial-scale=0.8, maximum-scale=1.2, minimum-scale=0.5";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Chart references missing column '{0}'")]
    MissingColumn(String),
}

/// Turns a derived snapshot into the complete dashboard page.
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Render the full page: one plotly figure per catalog entry, newest
    /// data inlined as JSON. Missing columns fail the whole render.
    pub fn render_dashboard(snapshot: &Snapshot) -> Result<String, RenderError> {
        let charts = spec::dashboard_charts();
        let dates = Self::date_values(&snapshot.df)?;
        let today = snapshot.today.to_string();

        let mut body = String::new();
        let mut script = String::new();
        script.push_str(&format!(
            "const config = {};\n",
            spec::chart_config()
        ));

        for (i, chart) in charts.iter().enumerate() {
            let figure = Self::figure(chart, &dates, &snapshot.df, &today)?;
            body.push_str(&format!("    <div id=\"{}\" class=\"chart\"></div>\n", chart.id));
            script.push_str(&format!(
                "const fig_{i} = {figure};\nPlotly.newPlot(\"{}\", fig_{i}.data, fig_{i}.layout, config);\n",
                chart.id
            ));
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="it">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="{VIEWPORT}">
    <title>{PAGE_TITLE}</title>
    <script src="{PLOTLY_JS}"></script>
    <style>
        body {{ margin: 0; font-family: sans-serif; }}
        .container {{ max-width: 1140px; margin: 0 auto; }}
        .chart {{ width: 100%; height: 450px; margin-bottom: 1rem; }}
    </style>
</head>
<body>
    <div class="container">
{body}    </div>
    <script>
{script}    </script>
</body>
</html>
"#
        ))
    }

    /// Build the plotly figure (data + layout) for one chart.
    fn figure(
        chart: &ChartSpec,
        dates: &[Value],
        df: &DataFrame,
        today: &str,
    ) -> Result<Value, RenderError> {
        let data: Vec<Value> = chart
            .traces
            .iter()
            .map(|trace| Self::trace_json(trace, dates, df))
            .collect::<Result<_, _>>()?;
        Ok(json!({ "data": data, "layout": Self::layout_json(chart, today) }))
    }

    fn trace_json(trace: &Trace, dates: &[Value], df: &DataFrame) -> Result<Value, RenderError> {
        let mut obj = Map::new();
        obj.insert("x".into(), Value::Array(dates.to_vec()));
        obj.insert("y".into(), Value::Array(Self::column_json(df, trace.column)?));
        let kind = match trace.kind {
            TraceKind::Bar => "bar",
            TraceKind::Scatter => "scatter",
        };
        obj.insert("type".into(), json!(kind));
        if let Some(name) = trace.name {
            obj.insert("name".into(), json!(name));
        }
        if let Some(color) = trace.color {
            match trace.kind {
                TraceKind::Bar => {
                    obj.insert("marker".into(), json!({ "color": color }));
                }
                TraceKind::Scatter => {
                    let mut line = Map::new();
                    line.insert("color".into(), json!(color));
                    if trace.dotted {
                        line.insert("dash".into(), json!("dot"));
                    }
                    obj.insert("line".into(), Value::Object(line));
                }
            }
        }
        if trace.axis == YAxis::Secondary {
            obj.insert("yaxis".into(), json!("y2"));
        }
        Ok(Value::Object(obj))
    }

    fn layout_json(chart: &ChartSpec, today: &str) -> Value {
        let mut layout = Map::new();
        layout.insert("title".into(), json!(chart.title));

        let xaxis = match chart.x_start {
            Some(start) => json!({
                "type": "date",
                "range": [start, today],
            }),
            None => json!({
                "type": "date",
                "rangeselector": { "buttons": spec::slider_buttons() },
                "rangeslider": { "visible": chart.range_slider },
            }),
        };
        layout.insert("xaxis".into(), xaxis);

        if let Some(mode) = chart.y_rangemode {
            layout.insert("yaxis".into(), json!({ "rangemode": mode.as_str() }));
        }
        if chart.has_secondary_axis() {
            let mut y2 = Map::new();
            y2.insert("side".into(), json!("right"));
            y2.insert("overlaying".into(), json!("y"));
            if let Some(mode) = chart.y2_rangemode {
                y2.insert("rangemode".into(), json!(mode.as_str()));
            }
            layout.insert("yaxis2".into(), Value::Object(y2));
        }
        Value::Object(layout)
    }

    /// A numeric column as JSON values; nulls become JSON `null`, which
    /// plotly draws as gaps.
    fn column_json(df: &DataFrame, name: &str) -> Result<Vec<Value>, RenderError> {
        let column = df
            .column(name)
            .map_err(|_| RenderError::MissingColumn(name.to_string()))?;
        let floats = column.cast(&DataType::Float64)?;
        let ca = floats.f64()?;
        Ok((0..ca.len())
            .map(|i| match ca.get(i) {
                Some(v) => json!(v),
                None => Value::Null,
            })
            .collect())
    }

    fn date_values(df: &DataFrame) -> Result<Vec<Value>, RenderError> {
        let column = df
            .column(DATE_COLUMN)
            .map_err(|_| RenderError::MissingColumn(DATE_COLUMN.to_string()))?;
        let strings = column.cast(&DataType::String)?;
        let ca = strings.str()?;
        Ok((0..ca.len())
            .map(|i| match ca.get(i) {
                Some(s) => json!(s),
                None => Value::Null,
            })
            .collect())
    }
}
