//! Built-in example tools.

mod clock;
mod fs;
mod math;
mod python;
mod weather;

use tools::{RegistrationError, ToolRegistry};

use crate::config::PythonConfig;

/// Registry holding every built-in tool, in manifest order.
pub fn registry(python: &PythonConfig) -> Result<ToolRegistry, RegistrationError> {
    let mut registry = ToolRegistry::new();
    registry.register_all([
        math::sum_two(),
        weather::get_weather(),
        clock::current_time(),
        fs::list_directory(),
        python::run_python(python.clone()),
    ])?;
    Ok(registry)
}
