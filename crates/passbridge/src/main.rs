use std::io;
use std::process::ExitCode;

use semver::Version;
use tracing::{error, info};

use passbridge::clipboard::{Clipboard, CommandClipboard, UnconfiguredClipboard};
use passbridge::pwgen::CharClassGenerator;
use passbridge::telemetry::{self, TelemetryError};
use passbridge::{Api, ApiError, Dispatcher, FsStore, StoreError};
use passbridge_config::Config;

const MAIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::main");

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("invalid build version: {0}")]
    Version(#[from] semver::Error),
    #[error("failed to open secret store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] ApiError),
}

fn main() -> ExitCode {
    let config = Config::load();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(target: MAIN_TARGET, %error, "helper terminated");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), RunError> {
    telemetry::initialise(config)?;

    let version = Version::parse(env!("CARGO_PKG_VERSION"))?;
    let store = FsStore::open(&config.store_root)?;
    let generator = CharClassGenerator;
    let clipboard: Box<dyn Clipboard> = config
        .clipboard_command
        .as_deref()
        .and_then(CommandClipboard::from_command_line)
        .map_or_else(
            || Box::new(UnconfiguredClipboard) as Box<dyn Clipboard>,
            |command| Box::new(command) as Box<dyn Clipboard>,
        );

    info!(
        target: MAIN_TARGET,
        %version,
        store_root = %config.store_root.display(),
        "serving native-messaging session"
    );

    let dispatcher = Dispatcher::new(version, &generator, clipboard.as_ref());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut api = Api::new(dispatcher, store, stdin.lock(), stdout.lock());
    api.serve()?;
    Ok(())
}
