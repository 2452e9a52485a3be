use chrono::Local;
use weatherview_core::{PresentationState, WeatherReading};

pub const LOADING_MESSAGE: &str = "Loading weather based on your location...";

/// Plain-text view of the presentation state.
pub fn render(state: &PresentationState) -> String {
    match &state.reading {
        Some(reading) => render_reading(reading),
        None => LOADING_MESSAGE.to_string(),
    }
}

fn render_reading(r: &WeatherReading) -> String {
    let observed = r.observed_at.with_timezone(&Local).format("%H:%M");
    format!(
        "{name}\n{temp}  {condition}\n\nFeels Like  {feels}\nHumidity    {humidity}\nWind Speed  {wind}\n(as of {observed})",
        name = r.place_name,
        temp = r.temperature_display(),
        condition = r.condition,
        feels = r.feels_like_display(),
        humidity = r.humidity_display(),
        wind = r.wind_display(),
    )
}
