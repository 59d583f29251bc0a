pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Deserialise a command's input from `--input <file>` or, failing that,
/// from piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        tracing::info!(path, "reading {what} from file");
        file::read_json(path)
    } else if let Some(data) = stdin::read_stdin()? {
        tracing::info!("reading {what} from stdin");
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file.json> or stdin required for {what}").into())
    }
}
