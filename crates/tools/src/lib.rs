//! Tool registry and manifest synthesis.
//!
//! Tools are declared with an explicit builder: a name, a description (or a
//! documentation block to take it from), a typed parameter list and a
//! handler. The [`ToolRegistry`] owns them, renders them as a manifest for a
//! model prompt, and invokes them by name.
//!
//! # Example
//!
//! ```
//! use tools::{ParamKind, ParamSpec, ToolDescriptor, ToolError, ToolRegistry};
//!
//! # async fn example() -> Result<(), tools::RegistrationError> {
//! let mut registry = ToolRegistry::new();
//! registry.register(
//!     ToolDescriptor::builder("sum_two")
//!         .doc("Adds two numbers together.\n\nArgs:\n    a (int): First.\n    b (int): Second.")
//!         .param(ParamSpec::new("a", ParamKind::Integer))
//!         .param(ParamSpec::new("b", ParamKind::Integer))
//!         .handler(|args| Ok::<_, ToolError>(args.get::<i64>("a")? + args.get::<i64>("b")?)),
//! )?;
//!
//! println!("{}", registry.manifest());
//! let nine = registry.invoke("sum_two", serde_json::json!({"a": 4, "b": 5})).await;
//! assert_eq!(nine, Ok(serde_json::json!(9)));
//! # Ok(())
//! # }
//! ```

mod arguments;
mod descriptor;
mod doc;
mod error;
mod manifest;
mod registry;

pub use arguments::Arguments;
pub use descriptor::{
    HandlerFuture, NO_DESCRIPTION, ParamKind, ParamSpec, ToolBuilder, ToolDescriptor,
};
pub use doc::DocBlock;
pub use error::{ExecutionFailure, RegistrationError, ToolError};
pub use manifest::{Manifest, NO_TOOLS_AVAILABLE};
pub use registry::{ToolRegistry, stringify_result};
