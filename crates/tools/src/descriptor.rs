//! Tool descriptors and their builder.

use crate::doc::DocBlock;
use crate::{Arguments, RegistrationError, ToolError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Description used when a tool declares none.
pub const NO_DESCRIPTION: &str = "No description found.";

/// Boxed future returned by async handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send>>;

type SyncFn = dyn Fn(Arguments) -> Result<Value, ToolError> + Send + Sync;
type AsyncFn = dyn Fn(Arguments) -> HandlerFuture + Send + Sync;

/// The callable behind a tool.
#[derive(Clone)]
pub(crate) enum Handler {
    /// Runs on the blocking pool; may block freely.
    Blocking(Arc<SyncFn>),
    /// Runs as a task on the async runtime.
    Async(Arc<AsyncFn>),
}

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    /// Map a type name to a kind. Unknown names fall back to `String`.
    ///
    /// ```
    /// use tools::ParamKind;
    /// assert_eq!(ParamKind::from_type_name("int"), ParamKind::Integer);
    /// assert_eq!(ParamKind::from_type_name("list[str]"), ParamKind::String);
    /// ```
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64"
            | "isize" | "usize" => Self::Integer,
            "float" | "number" | "f32" | "f64" => Self::Number,
            "bool" | "boolean" => Self::Boolean,
            _ => Self::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Whether a JSON value is acceptable for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub description: String,
    #[serde(skip)]
    pub required: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            required: true,
        }
    }

    /// A parameter with no declared type (treated as a string).
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::default())
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the parameter as optional; the handler supplies a default.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A registered tool: its manifest entry plus the handler.
#[derive(Clone, Serialize)]
pub struct ToolDescriptor {
    #[serde(rename = "tool_name")]
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) parameters: Vec<ParamSpec>,
    #[serde(skip)]
    pub(crate) handler: Handler,
}

impl ToolDescriptor {
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParamSpec] {
        &self.parameters
    }

    /// JSON Schema describing the parameters, for protocols that expect one.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                let mut property = json!({ "type": p.kind.as_str() });
                if !p.description.is_empty() {
                    property["description"] = Value::String(p.description.clone());
                }
                (p.name.clone(), property)
            })
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check raw parameters against the declared list.
    pub(crate) fn check_arguments(&self, parameters: Value) -> Result<Arguments, ToolError> {
        let map = match parameters {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "parameters must be an object, got {}",
                    json_type(&other)
                )));
            }
        };

        if let Some(unexpected) = map
            .keys()
            .find(|key| !self.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(ToolError::InvalidInput(format!(
                "{}() got an unexpected argument '{unexpected}'",
                self.name
            )));
        }

        for spec in &self.parameters {
            match map.get(&spec.name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(ToolError::InvalidInput(format!(
                        "{}() missing required argument '{}'",
                        self.name, spec.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !spec.kind.accepts(value) => {
                    return Err(ToolError::InvalidInput(format!(
                        "argument '{}' must be {}, got {}",
                        spec.name,
                        spec.kind,
                        json_type(value)
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(Arguments::new(map))
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_output<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Execution(format!("serialize result: {e}")))
}

/// Builder for a [`ToolDescriptor`].
///
/// ```
/// use tools::{ParamKind, ParamSpec, ToolDescriptor, ToolError};
///
/// let tool = ToolDescriptor::builder("sum_two")
///     .description("Adds two numbers together.")
///     .param(ParamSpec::new("a", ParamKind::Integer))
///     .param(ParamSpec::new("b", ParamKind::Integer))
///     .handler(|args| Ok::<_, ToolError>(args.get::<i64>("a")? + args.get::<i64>("b")?));
/// ```
pub struct ToolBuilder {
    name: String,
    description: Option<String>,
    doc: Option<DocBlock>,
    parameters: Vec<ParamSpec>,
    handler: Option<Handler>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            doc: None,
            parameters: Vec::new(),
            handler: None,
        }
    }

    /// Set the description explicitly. Takes precedence over `doc`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a documentation block to derive descriptions from.
    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = Some(DocBlock::parse(doc));
        self
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    pub fn params(mut self, specs: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.parameters.extend(specs);
        self
    }

    /// Attach a synchronous handler. It runs on the blocking thread pool,
    /// so it may block (e.g. wait on a child process).
    pub fn handler<F, T, E>(mut self, f: F) -> Self
    where
        F: Fn(Arguments) -> Result<T, E> + Send + Sync + 'static,
        T: Serialize + 'static,
        E: Into<ToolError> + 'static,
    {
        self.handler = Some(Handler::Blocking(Arc::new(move |args| {
            f(args).map_err(Into::into).and_then(to_output)
        })));
        self
    }

    /// Attach an asynchronous handler.
    pub fn async_handler<F, Fut, T, E>(mut self, f: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + 'static,
        E: Into<ToolError> + 'static,
    {
        self.handler = Some(Handler::Async(Arc::new(move |args| -> HandlerFuture {
            let fut = f(args);
            Box::pin(async move { fut.await.map_err(Into::into).and_then(to_output) })
        })));
        self
    }

    pub fn build(self) -> Result<ToolDescriptor, RegistrationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }

        let mut seen = HashSet::new();
        for spec in &self.parameters {
            if !seen.insert(spec.name.as_str()) {
                return Err(RegistrationError::DuplicateParameter {
                    tool: name,
                    parameter: spec.name.clone(),
                });
            }
        }

        let handler = self
            .handler
            .ok_or_else(|| RegistrationError::MissingHandler(name.clone()))?;

        let doc = self.doc.unwrap_or_default();
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .or_else(|| doc.summary().map(str::to_string))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        let parameters = self
            .parameters
            .into_iter()
            .map(|mut spec| {
                if spec.description.is_empty() {
                    spec.description = doc.parameter(&spec.name).unwrap_or_default();
                }
                spec
            })
            .collect();

        Ok(ToolDescriptor {
            name,
            description,
            parameters,
            handler,
        })
    }
}
