//! Run a Python script in a child process.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tools::{Arguments, ParamKind, ParamSpec, ToolBuilder, ToolDescriptor, ToolError};
use tracing::debug;
use uuid::Uuid;

use crate::config::PythonConfig;

pub fn run_python(config: PythonConfig) -> ToolBuilder {
    let config = Arc::new(config);
    ToolDescriptor::builder("run_python")
        .doc(
            "Executes a given string of Python code to solve a math problem and returns the output.
            The code should be a complete, runnable script that prints the final result to standard output.

            Args:
                python_code (str): A string containing the Python code to execute.",
        )
        .param(ParamSpec::new("python_code", ParamKind::String))
        .async_handler(move |args| execute(Arc::clone(&config), args))
}

async fn execute(config: Arc<PythonConfig>, args: Arguments) -> Result<String, ToolError> {
    let code: String = args.get("python_code")?;
    let script = Script::write(&code).await?;
    debug!(path = %script.path.display(), interpreter = %config.interpreter, "running script");

    let child = Command::new(&config.interpreter)
        .arg(&script.path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ToolError::Execution(format!("failed to start {}: {e}", config.interpreter)))?;

    let output = tokio::time::timeout(config.timeout(), child.wait_with_output())
        .await
        .map_err(|_| ToolError::Timeout(config.timeout().as_millis() as u64))??;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() {
        return Ok(stdout.trim().to_string());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(ToolError::Execution(format!(
        "python exited with {}\nSTDOUT:\n{stdout}\nSTDERR:\n{stderr}",
        output.status
    )))
}

/// A uniquely named script file, removed on drop.
struct Script {
    path: PathBuf,
}

impl Script {
    async fn write(code: &str) -> Result<Self, ToolError> {
        let path = std::env::temp_dir().join(format!("toolcall-{}.py", Uuid::new_v4()));
        tokio::fs::write(&path, code).await?;
        Ok(Self { path })
    }
}

impl Drop for Script {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
