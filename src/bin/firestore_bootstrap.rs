use std::env;
use std::process::ExitCode;

use firestore_bootstrap::bootstrap::{ConfigBootstrap, LOGGER};
use firestore_bootstrap::logger::set_log_level;

fn main() -> ExitCode {
    if let Ok(level) = env::var("FIREBASE_LOG_LEVEL") {
        if let Err(err) = set_log_level(level) {
            LOGGER.warn(err.to_string());
        }
    }

    match ConfigBootstrap::from_env().and_then(|bootstrap| bootstrap.initialize()) {
        Ok(client) => {
            LOGGER.info(format!(
                "Firestore for project {} at {}",
                client.firestore().project_id(),
                client.firestore().base_url()
            ));
            ExitCode::SUCCESS
        }
        Err(err) => {
            LOGGER.error(format!("Startup aborted: {err}"));
            ExitCode::FAILURE
        }
    }
}
