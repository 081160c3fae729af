use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{interval, Duration};

use tradewatch::logging::{log, obj, v_str, Domain, Level};
use tradewatch::{CaseData, Engine, EngineConfig, ModelOptions};

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Request {
    Command {
        command: String,
    },
    Analyze {
        typology: String,
        #[serde(default)]
        case: CaseData,
        #[serde(default)]
        min_signal_confidence: Option<f64>,
    },
}

fn handle(engine: &Engine, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return json!({"ok": false, "error": format!("bad request: {e}")}),
    };
    match request {
        Request::Command { command } => match command.as_str() {
            "models" => json!({"ok": true, "models": engine.get_models_info()}),
            "reload" => match engine.reload() {
                Ok(outcome) => json!({"ok": true, "reload": outcome}),
                Err(e) => json!({"ok": false, "error": e.to_string(), "generation": engine.generation()}),
            },
            other => json!({"ok": false, "error": format!("unknown command `{other}`")}),
        },
        Request::Analyze {
            typology,
            case,
            min_signal_confidence,
        } => {
            let options = ModelOptions { min_signal_confidence };
            match engine.analyze_with(&typology, &case, &options) {
                Ok(result) => json!({"ok": true, "result": result}),
                Err(e) => json!({"ok": false, "error": e.to_string()}),
            }
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Reload whenever the config file's mtime moves.
async fn watch_config(engine: Arc<Engine>, path: PathBuf, every: Duration) {
    let mut last = modified_at(&path);
    let mut tick = interval(every);
    loop {
        tick.tick().await;
        let now = modified_at(&path);
        if now.is_none() || now == last {
            continue;
        }
        last = now;
        let engine = engine.clone();
        match tokio::task::spawn_blocking(move || engine.reload()).await {
            Ok(Ok(outcome)) => log(
                Level::Info,
                Domain::Reload,
                "config_change_applied",
                obj(&[("outcome", json!(outcome))]),
            ),
            // Rejections are logged by the engine itself.
            Ok(Err(_)) => {}
            Err(e) => log(
                Level::Error,
                Domain::Reload,
                "reload_task_failed",
                obj(&[("error", v_str(&e.to_string()))]),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = EngineConfig::from_env();
    let engine = Arc::new(Engine::load(cfg.clone()));

    log(
        Level::Info,
        Domain::System,
        "engine_ready",
        obj(&[
            ("config_path", v_str(&cfg.model_config_path)),
            ("typologies", json!(engine.typologies())),
            ("generation", json!(engine.generation())),
            ("reload_poll_secs", json!(cfg.reload_poll_secs)),
        ]),
    );

    if cfg.reload_poll_secs > 0 {
        tokio::spawn(watch_config(
            engine.clone(),
            PathBuf::from(&cfg.model_config_path),
            Duration::from_secs(cfg.reload_poll_secs),
        ));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut served = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let engine = engine.clone();
        let response = tokio::task::spawn_blocking(move || handle(&engine, &line)).await?;
        stdout.write_all(response.to_string().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        served += 1;
    }

    log(
        Level::Info,
        Domain::System,
        "engine_stopped",
        obj(&[("requests", json!(served))]),
    );
    Ok(())
}
