use chrono::Local;
use tools::{ToolBuilder, ToolDescriptor, ToolError};

pub fn current_time() -> ToolBuilder {
    ToolDescriptor::builder("current_time")
        .description("Returns the current local time as HH:MM:SS.")
        .handler(|_| Ok::<_, ToolError>(Local::now().format("%H:%M:%S").to_string()))
}
