mod commands;

pub use commands::{Cli, ColorModeArg, Command, GlobalArgs, OutputFormat};
