//! HTML pages for the prediction form

use std::fmt::Write;

use severity_core::{
    Prediction, RoadType, Severity, VehicleType, Weather, DEFAULT_AGE, MAX_AGE, MIN_AGE,
};

use crate::models::PredictRequest;

const TITLE: &str = "Road Accident Severity Prediction";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
form { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
label { display: flex; flex-direction: column; gap: .25rem; font-weight: 600; }
button { grid-column: span 2; padding: .6rem; font-size: 1rem; }
.result { margin-top: 1.5rem; padding: 1rem; border-radius: .5rem; font-size: 1.2rem; font-weight: 700; }
.fatal { background: #fde2e2; }
.serious { background: #fff4cc; }
.slight { background: #dff5e1; }
.unknown { background: #e4e7eb; }
table { border-collapse: collapse; margin-top: .5rem; }
td, th { border: 1px solid #cbd2d9; padding: .25rem .5rem; text-align: left; }
"#;

/// Escape text for HTML bodies and attribute values
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn select(name: &str, caption: &str, options: &[&str], selected: &str) -> String {
    let mut html = format!("<label>{}<select name=\"{}\">", caption, name);
    for option in options {
        let marker = if *option == selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{0}\"{1}>{0}</option>", escape(option), marker);
    }
    html.push_str("</select></label>");
    html
}

fn labels<T: Copy>(values: &[T], label: fn(T) -> &'static str) -> Vec<&'static str> {
    values.iter().map(|v| label(*v)).collect()
}

fn form(age: u32, vehicle_type: VehicleType, weather: Weather, road_type: RoadType) -> String {
    format!(
        r#"<form method="post" action="/predict">
<label>Driver Age<input type="number" name="age" min="{min}" max="{max}" step="1" value="{age}" required></label>
{weather}
{vehicle}
{road}
<button type="submit">Predict Severity</button>
</form>"#,
        min = MIN_AGE,
        max = MAX_AGE,
        age = age,
        vehicle = select("vehicle_type", "Vehicle Type", &labels(VehicleType::ALL, VehicleType::label), vehicle_type.label()),
        weather = select("weather", "Weather Condition", &labels(Weather::ALL, Weather::label), weather.label()),
        road = select("road_type", "Road Type", &labels(RoadType::ALL, RoadType::label), road_type.label()),
    )
}

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
<p>Enter accident details below and click <strong>Predict Severity</strong> to see the severity level of the accident.</p>
<h2>Accident Details</h2>
{body}
</body>
</html>"#,
        title = TITLE,
        style = STYLE,
        body = body,
    )
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Fatal => "fatal",
        Severity::Serious => "serious",
        Severity::Slight => "slight",
        Severity::Unknown => "unknown",
    }
}

/// Empty form with default values
pub fn form_page() -> String {
    page(&form(DEFAULT_AGE, VehicleType::Car, Weather::Clear, RoadType::Highway))
}

/// Form prefilled with the submission, followed by the prediction
pub fn result_page(request: &PredictRequest, prediction: &Prediction) -> String {
    let mut body = form(request.age, request.vehicle_type, request.weather, request.road_type);

    let _ = write!(
        body,
        r#"<div class="result {}">Predicted Accident Severity: {}</div>"#,
        severity_class(prediction.severity),
        escape(prediction.label),
    );

    body.push_str("<details><summary>See processed features</summary><table><tr><th>Column</th><th>Value</th></tr>");
    for (column, value) in prediction.row.iter() {
        let _ = write!(body, "<tr><td>{}</td><td>{}</td></tr>", escape(column), value);
    }
    body.push_str("</table></details>");

    page(&body)
}
