//! Canned weather lookups.

use serde_json::{Value, json};
use tools::{ParamKind, ParamSpec, ToolBuilder, ToolDescriptor, ToolError};

pub fn get_weather() -> ToolBuilder {
    ToolDescriptor::builder("get_weather")
        .doc(
            "Get the current weather for a given city.

            Args:
                city (str): The name of the city.
                unit (str): The temperature unit, 'celsius' or 'fahrenheit'.",
        )
        .param(ParamSpec::new("city", ParamKind::String))
        .param(ParamSpec::new("unit", ParamKind::String).optional())
        .handler(|args| {
            let city: String = args.get("city")?;
            let unit: String = args.get_or("unit", "celsius".to_string())?;
            Ok::<_, ToolError>(lookup(&city, &unit))
        })
}

/// Mock data; an unknown city is reported in the payload, not as a failure.
fn lookup(city: &str, unit: &str) -> Value {
    let city = city.to_lowercase();
    if city.contains("chicago") {
        json!({"city": "Chicago", "temperature": "12", "unit": unit})
    } else if city.contains("tokyo") {
        json!({"city": "Tokyo", "temperature": "25", "unit": unit})
    } else {
        json!({"error": "City not found"})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tools::{ToolRegistry, stringify_result};

    #[tokio::test]
    async fn known_and_unknown_cities() {
        let mut registry = ToolRegistry::new();
        registry.register(get_weather()).unwrap();

        let out = registry
            .invoke("get_weather", json!({"city": "Tokyo, Japan"}))
            .await;
        assert_eq!(
            out.unwrap(),
            json!({"city": "Tokyo", "temperature": "25", "unit": "celsius"})
        );

        let out = registry
            .invoke("get_weather", json!({"city": "chicago", "unit": "fahrenheit"}))
            .await;
        assert_eq!(out.unwrap()["unit"], "fahrenheit");

        let out = registry
            .invoke("get_weather", json!({"city": "Atlantis"}))
            .await;
        assert_eq!(stringify_result(&out), r#"{"error":"City not found"}"#);
    }
}
