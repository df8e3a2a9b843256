use std::io::{self, BufRead, Write};

use cab_core::{config::Settings, protocol, telemetry};
use tracing::error;

fn main() {
    telemetry::init_telemetry();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to load settings");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(|| protocol::handle(&line, &settings));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                error!("request handler panicked");
                serde_json::json!({
                    "status": "error",
                    "message": "internal core error"
                })
                .to_string()
            }
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
