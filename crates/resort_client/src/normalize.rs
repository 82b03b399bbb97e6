//! Weather payload normalization.
//!
//! The upstream detail endpoint has shipped several shapes for the same
//! data: forecast days keyed by `date`, `forecast_date`, or epoch `dt`;
//! temperatures as a nested `temperature` object or flat
//! `temperature_max`/`temperature_min` fields; numbers occasionally encoded
//! as strings. All of that skew is absorbed here so the rest of the system
//! only ever sees the canonical `WeatherSnapshot` / `ForecastDay` types.
//!
//! Policy: fail-closed for the current-conditions block (any violation
//! invalidates the whole snapshot), best-effort per forecast day (a day
//! that cannot be coerced is dropped, the rest survive).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use common::{CurrentConditions, ForecastDay, WeatherSnapshot};

/// Reshape a raw detail payload into a snapshot, or `None` if the payload
/// does not carry usable weather. Never errors: callers degrade to
/// "weather unavailable".
pub fn normalize_weather(payload: &Value) -> Option<WeatherSnapshot> {
    let current = parse_current(payload.get("currentWeather")?)?;

    let forecast_value = payload.get("forecast").or_else(|| payload.get("daily"))?;
    let raw_days = forecast_value.as_array()?;

    let mut forecast = Vec::with_capacity(raw_days.len());
    for raw in raw_days {
        match parse_day(raw) {
            Some(day) => forecast.push(day),
            None => debug!("dropping uncoercible forecast day: {raw}"),
        }
    }

    Some(WeatherSnapshot { current, forecast })
}

/// Current conditions are all-or-nothing: the block is only accepted when
/// its required fields are present and coercible.
fn parse_current(block: &Value) -> Option<CurrentConditions> {
    let temperature = coerce_num(block.get("temperature")?)?;
    let feels_like = coerce_num(block.get("feels_like")?)?;
    let wind_gust = coerce_num(block.get("wind_gust")?)?;
    let weather_description = block.get("weather_description")?.as_str()?.to_string();

    Some(CurrentConditions {
        temperature,
        feels_like,
        pressure: opt_num(block, &["pressure"])?,
        humidity: opt_num(block, &["humidity"])?,
        wind_gust,
        cloudiness: opt_num(block, &["cloudiness"])?,
        uv_index: opt_num(block, &["uv_index", "uvIndex"])?,
        weather_description,
        icon: block
            .get("icon")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// One forecast day, from either the nested or the flat wire shape.
/// Returns `None` when the date or the min/max temperatures cannot be
/// recovered, or when a present numeric field is garbage.
fn parse_day(raw: &Value) -> Option<ForecastDay> {
    let date = parse_date(raw)?;

    let nested_temp = raw.get("temperature").filter(|t| t.is_object());
    let (temp_max, temp_min, feels_day, feels_night) = match nested_temp {
        Some(t) => (
            coerce_num(t.get("max")?)?,
            coerce_num(t.get("min")?)?,
            opt_num(t, &["feelsLikeDay", "feels_like_day"])?,
            opt_num(t, &["feelsLikeNight", "feels_like_night"])?,
        ),
        None => (
            coerce_num(raw.get("temperature_max")?)?,
            coerce_num(raw.get("temperature_min")?)?,
            opt_num(raw, &["feels_like_day"])?,
            opt_num(raw, &["feels_like_night"])?,
        ),
    };

    let wind = raw.get("wind").filter(|w| w.is_object());
    let (wind_speed, wind_direction, wind_gust) = match wind {
        Some(w) => (
            opt_num(w, &["speed"])?,
            opt_num(w, &["direction"])?,
            opt_num(w, &["gust"])?,
        ),
        None => (
            opt_num(raw, &["wind_speed"])?,
            opt_num(raw, &["wind_direction"])?,
            opt_num(raw, &["wind_gust"])?,
        ),
    };

    let conditions = raw.get("conditions").filter(|c| c.is_object());
    let (main, description, precipitation_probability, snow_amount, rain_amount) = match conditions
    {
        Some(c) => (
            str_or_empty(c, &["main"]),
            str_or_empty(c, &["description"]),
            opt_num(c, &["precipitationProbability", "precipitation_probability"])?,
            opt_num(c, &["snowAmount", "snow_amount"])?,
            opt_num(c, &["rainAmount", "rain_amount"])?,
        ),
        None => (
            str_or_empty(raw, &["weather_main"]),
            str_or_empty(raw, &["weather_description"]),
            opt_num(raw, &["precipitation_probability"])?,
            opt_num(raw, &["snow_amount"])?,
            opt_num(raw, &["rain_amount"])?,
        ),
    };

    Some(ForecastDay {
        date,
        temp_min,
        temp_max,
        feels_like_day: feels_day,
        feels_like_night: feels_night,
        wind_speed,
        wind_direction,
        wind_gust,
        precipitation_probability,
        snow_amount,
        rain_amount,
        uv_index: opt_num(raw, &["uvIndex", "uv_index"])?,
        cloudiness: opt_num(raw, &["cloudiness"])?,
        conditions: main,
        description,
    })
}

/// The date field has appeared as `date`, `forecast_date` (string forms),
/// or `dt` (epoch seconds). Everything normalizes to UTC.
fn parse_date(raw: &Value) -> Option<DateTime<Utc>> {
    if let Some(s) = raw
        .get("date")
        .or_else(|| raw.get("forecast_date"))
        .and_then(Value::as_str)
    {
        return parse_date_str(s);
    }

    let dt = raw.get("dt")?;
    let secs = coerce_num(dt)? as i64;
    DateTime::from_timestamp(secs, 0)
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// JSON number, or a string that parses as one. The upstream has shipped
/// both for the same field.
fn coerce_num(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Optional numeric field: absent means 0.0, present-but-uncoercible
/// poisons the parent record (`None` propagates up and drops the day).
fn opt_num(obj: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = obj.get(key) {
            if v.is_null() {
                continue;
            }
            return coerce_num(v);
        }
    }
    Some(0.0)
}

fn str_or_empty(obj: &Value, keys: &[&str]) -> String {
    for key in keys {
        if let Some(s) = obj.get(key).and_then(Value::as_str) {
            return s.to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_payload() -> Value {
        json!({
            "resort": {"resort_id": "r-1"},
            "currentWeather": {
                "resort_id": "r-1",
                "timestamp": 1736000000,
                "temperature": -4.2,
                "feels_like": -9.0,
                "pressure": 1021,
                "humidity": 78,
                "weather_description": "light snow",
                "uv_index": 1,
                "wind_gust": 12.4,
                "cloudiness": 90
            },
            "forecast": [
                {
                    "date": "2026-01-05T00:00:00Z",
                    "temperature": {"max": -1.0, "min": -8.0, "feelsLikeDay": -5.0, "feelsLikeNight": -12.0},
                    "wind": {"speed": 6.1, "direction": 270, "gust": 14.0},
                    "conditions": {
                        "main": "Snow",
                        "description": "moderate snow",
                        "precipitationProbability": 0.8,
                        "snowAmount": 11.5,
                        "rainAmount": 0
                    },
                    "uvIndex": 2,
                    "cloudiness": 100
                },
                {
                    "date": "2026-01-06T00:00:00Z",
                    "temperature": {"max": 0.5, "min": -6.0},
                    "wind": {"speed": 3.0, "direction": 180, "gust": 7.2},
                    "conditions": {"main": "Clear", "description": "clear sky"}
                }
            ]
        })
    }

    #[test]
    fn test_nested_payload_normalizes() {
        let snapshot = normalize_weather(&nested_payload()).expect("snapshot should build");
        assert!((snapshot.current.temperature + 4.2).abs() < 1e-9);
        assert_eq!(snapshot.current.weather_description, "light snow");
        assert_eq!(snapshot.forecast.len(), 2);

        let day = &snapshot.forecast[0];
        assert!((day.temp_max + 1.0).abs() < 1e-9);
        assert!((day.snow_amount - 11.5).abs() < 1e-9);
        assert_eq!(day.conditions, "Snow");
    }

    #[test]
    fn test_flat_payload_normalizes() {
        let payload = json!({
            "currentWeather": {
                "temperature": -2.0,
                "feels_like": -6.5,
                "wind_gust": 9.0,
                "weather_description": "overcast"
            },
            "forecast": [{
                "forecast_date": "2026-01-07",
                "temperature_max": 1.0,
                "temperature_min": -5.0,
                "feels_like_day": -1.0,
                "feels_like_night": -8.0,
                "wind_speed": 4.0,
                "wind_direction": 90,
                "wind_gust": 10.0,
                "precipitation_probability": 0.4,
                "weather_main": "Clouds",
                "weather_description": "overcast clouds",
                "snow_amount": 2.0,
                "rain_amount": 0.0,
                "uv_index": 1,
                "cloudiness": 85
            }]
        });

        let snapshot = normalize_weather(&payload).expect("flat shape should normalize");
        assert_eq!(snapshot.forecast.len(), 1);
        let day = &snapshot.forecast[0];
        assert_eq!(day.date.to_rfc3339(), "2026-01-07T00:00:00+00:00");
        assert!((day.temp_min + 5.0).abs() < 1e-9);
        assert_eq!(day.description, "overcast clouds");
    }

    #[test]
    fn test_epoch_dt_dates_normalize() {
        let payload = json!({
            "currentWeather": {
                "temperature": 0.0,
                "feels_like": 0.0,
                "wind_gust": 0.0,
                "weather_description": "clear"
            },
            "daily": [{
                "dt": 1767571200,
                "temperature": {"max": 2.0, "min": -3.0},
                "wind": {},
                "conditions": {}
            }]
        });

        let snapshot = normalize_weather(&payload).expect("daily/dt shape should normalize");
        assert_eq!(snapshot.forecast[0].date.to_rfc3339(), "2026-01-05T00:00:00+00:00");
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let payload = json!({
            "currentWeather": {
                "temperature": "-3.5",
                "feels_like": "-7",
                "wind_gust": "11.2",
                "weather_description": "snow"
            },
            "forecast": [{
                "date": "2026-01-05",
                "temperature": {"max": "1.5", "min": "-4"},
                "wind": {"speed": "5"},
                "conditions": {}
            }]
        });

        let snapshot = normalize_weather(&payload).expect("strings should coerce");
        assert!((snapshot.current.temperature + 3.5).abs() < 1e-9);
        assert!((snapshot.forecast[0].wind_speed - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_current_fails_closed() {
        let mut payload = nested_payload();
        payload["currentWeather"]["temperature"] = json!("not a number");
        assert!(normalize_weather(&payload).is_none());

        let mut payload = nested_payload();
        payload["currentWeather"]
            .as_object_mut()
            .unwrap()
            .remove("wind_gust");
        assert!(normalize_weather(&payload).is_none());

        let mut payload = nested_payload();
        payload["currentWeather"]["weather_description"] = json!(42);
        assert!(normalize_weather(&payload).is_none());
    }

    #[test]
    fn test_missing_forecast_fails_closed() {
        let mut payload = nested_payload();
        payload.as_object_mut().unwrap().remove("forecast");
        assert!(normalize_weather(&payload).is_none());

        let mut payload = nested_payload();
        payload["forecast"] = json!("not an array");
        assert!(normalize_weather(&payload).is_none());
    }

    #[test]
    fn test_bad_day_is_dropped_not_fatal() {
        let mut payload = nested_payload();
        payload["forecast"][0]["temperature"]["min"] = json!("garbage");

        let snapshot = normalize_weather(&payload).expect("snapshot survives a bad day");
        assert_eq!(snapshot.forecast.len(), 1, "only the bad day is dropped");
        assert_eq!(snapshot.forecast[0].date.to_rfc3339(), "2026-01-06T00:00:00+00:00");
    }

    #[test]
    fn test_day_without_date_is_dropped() {
        let mut payload = nested_payload();
        payload["forecast"][1].as_object_mut().unwrap().remove("date");

        let snapshot = normalize_weather(&payload).expect("snapshot survives");
        assert_eq!(snapshot.forecast.len(), 1);
    }

    #[test]
    fn test_inverted_min_max_is_tolerated() {
        let mut payload = nested_payload();
        payload["forecast"][0]["temperature"]["min"] = json!(5.0);
        payload["forecast"][0]["temperature"]["max"] = json!(-5.0);

        let snapshot = normalize_weather(&payload).expect("inverted range is upstream's problem");
        assert!(snapshot.forecast[0].temp_min > snapshot.forecast[0].temp_max);
    }
}
