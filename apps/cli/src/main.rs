//! tabsplit binary. See the library crate for the commands.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tabsplit_cli::main_entry().await
}
