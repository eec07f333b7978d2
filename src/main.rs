//! Kodegen Bundler Setup - installer setup builder.
//!
//! Builds macOS app bundles, disk images and Windows MSI packages from a
//! declarative `setup.toml`.

use kodegen_bundler_setup::cli::{self, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let output = OutputManager::new(args.verbose, args.quiet);

    let exit_code = match cli::run(args).await {
        Ok(code) => code,
        Err(e) => {
            output.error(&e.to_string());
            for suggestion in e.recovery_suggestions() {
                output.error(&format!("  {}", suggestion));
            }
            1
        }
    };

    process::exit(exit_code);
}
