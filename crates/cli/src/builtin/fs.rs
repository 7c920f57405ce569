//! Directory listing.

use std::io::ErrorKind;
use std::path::PathBuf;

use tools::{Arguments, ParamKind, ParamSpec, ToolBuilder, ToolDescriptor, ToolError};

pub fn list_directory() -> ToolBuilder {
    ToolDescriptor::builder("list_directory")
        .doc(
            "Lists all files and subdirectories within a given local directory path.
            The path should be an absolute path or relative to the user's home directory.

            Args:
                path (str): Directory to list. Defaults to the current directory.",
        )
        .param(ParamSpec::new("path", ParamKind::String).optional())
        .async_handler(list)
}

async fn list(args: Arguments) -> Result<Vec<String>, ToolError> {
    let path: String = args.get_or("path", ".".to_string())?;
    let dir = expand_home(&path, std::env::var_os("HOME").map(PathBuf::from));

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ToolError::Execution(format!("{}: {e}", dir.display()))),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Expand a leading `~` to `home`.
fn expand_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}
