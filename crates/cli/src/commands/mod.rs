pub mod catalog;
pub mod config;
pub mod quote;
pub mod render;

/// What a subcommand hands back to the entry point: text for stdout plus the
/// process exit code.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { exit_code: 1, output: format!("error: {}", message.into()) }
    }
}
