//! Structured logging for the surveillance engine.
//!
//! Design goals:
//! 1. Multi-level granularity (TRACE → FATAL)
//! 2. Domain categories for filtering
//! 3. Audit support via sequence numbers and model fingerprints
//! 4. Stdout stays free for results: records go to stderr, and to
//!    `<LOG_DIR>/<run_id>/events.jsonl` when `LOG_DIR` is set

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Config,    // Document reading, settings
    Model,     // Validation, network construction
    Evidence,  // Signal mapping
    Inference, // Variable elimination, numeric checks
    Risk,      // Scoring, thresholds, suppression
    Registry,  // Typology registration and lookup
    Reload,    // Snapshot swaps
    System,    // Startup, shutdown
    Profile,   // Performance profiling
    Audit,     // Per-analysis audit trail
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Config => "config",
            Domain::Model => "model",
            Domain::Evidence => "evidence",
            Domain::Inference => "inference",
            Domain::Risk => "risk",
            Domain::Registry => "registry",
            Domain::Reload => "reload",
            Domain::System => "system",
            Domain::Profile => "profile",
            Domain::Audit => "audit",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Sequence counter and run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static PROFILE_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    min_level: Level,
    stderr: bool,
    events: Option<Mutex<BufWriter<File>>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let stderr = std::env::var("LOG_STDERR")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        let events = std::env::var("LOG_DIR").ok().and_then(|base| {
            let mut run_dir = PathBuf::from(base);
            run_dir.push(&run_id);
            if let Err(err) = create_dir_all(&run_dir) {
                eprintln!("[log] failed to create run dir: {}", err);
                return None;
            }
            match File::create(run_dir.join("events.jsonl")) {
                Ok(f) => Some(Mutex::new(BufWriter::new(f))),
                Err(err) => {
                    eprintln!("[log] failed to create events log: {}", err);
                    None
                }
            }
        });

        RunContext {
            run_id,
            min_level: Level::from_env(),
            stderr,
            events,
        }
    })
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["typology", "case_id", "generation", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    #[cfg(test)]
    capture::record(level, domain, event);
    let ctx = ensure_run_context();
    if level < ctx.min_level || !domain.is_enabled() {
        return;
    }
    emit_record(ctx, level, domain.as_str(), event, fields);
}

fn emit_record(ctx: &RunContext, level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let (mut top, data) = split_fields(fields);

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));

    let line = Value::Object(entry).to_string();
    if let Some(events) = &ctx.events {
        write_line(events, &line);
    }
    if ctx.stderr {
        eprintln!("{}", line);
    }
}


// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_snapshot_published(generation: u64, fingerprint: &str, typologies: &[String], source: &str) {
    log(
        Level::Info,
        Domain::Reload,
        "snapshot_published",
        obj(&[
            ("generation", json!(generation)),
            ("fingerprint", v_str(fingerprint)),
            ("typologies", Value::Array(typologies.iter().map(|t| v_str(t)).collect())),
            ("source", v_str(source)),
        ]),
    );
}

pub fn log_reload_rejected(reason: &str, kept_generation: u64) {
    log(
        Level::Error,
        Domain::Reload,
        "reload_rejected",
        obj(&[
            ("reason", v_str(reason)),
            ("generation", json!(kept_generation)),
            ("msg", v_str("running snapshot kept")),
        ]),
    );
}

pub fn log_evidence_mapped(typology: &str, case_id: Option<&str>, observed: usize, skipped: usize) {
    log(
        Level::Debug,
        Domain::Evidence,
        "evidence_mapped",
        obj(&[
            ("typology", v_str(typology)),
            ("case_id", case_id.map(v_str).unwrap_or(Value::Null)),
            ("observed", json!(observed)),
            ("skipped", json!(skipped)),
        ]),
    );
}

pub fn log_analysis(
    typology: &str,
    case_id: Option<&str>,
    generation: u64,
    score: f64,
    level: &str,
    esi: f64,
    fallback_nodes: usize,
) {
    log(
        Level::Info,
        Domain::Audit,
        "analysis",
        obj(&[
            ("typology", v_str(typology)),
            ("case_id", case_id.map(v_str).unwrap_or(Value::Null)),
            ("generation", json!(generation)),
            ("score", v_num(score)),
            ("level", v_str(level)),
            ("esi", v_num(esi)),
            ("fallback_nodes", json!(fallback_nodes)),
        ]),
    );
}

/// A posterior that failed to normalise points at a cpd defect, not a
/// transient fault.
pub fn log_model_defect(typology: &str, node: &str, detail: &str) {
    log(
        Level::Error,
        Domain::Inference,
        "model_defect",
        obj(&[
            ("typology", v_str(typology)),
            ("node", v_str(node)),
            ("detail", v_str(detail)),
            ("msg", v_str("configuration defect: posterior failed to normalise")),
        ]),
    );
}

pub fn log_suppression(typology: &str, raw_score: f64, factor: f64, flags: &[String]) {
    log(
        Level::Debug,
        Domain::Risk,
        "context_suppression",
        obj(&[
            ("typology", v_str(typology)),
            ("raw_score", v_num(raw_score)),
            ("factor", v_num(factor)),
            ("flags", Value::Array(flags.iter().map(|f| v_str(f)).collect())),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Profiling scope that emits structured timing on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Option<Map<String, Value>>,
    started: Instant,
    enabled: bool,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            context: None,
            started: Instant::now(),
            enabled: Self::should_sample(),
        }
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        let enabled = Self::should_sample();
        Self {
            label,
            context: if enabled { Some(obj(fields)) } else { None },
            started: Instant::now(),
            enabled,
        }
    }

    fn should_sample() -> bool {
        std::env::var("PROFILE_SAMPLE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .map(|p| {
                if p >= 1.0 {
                    true
                } else if p <= 0.0 {
                    false
                } else {
                    let seq = PROFILE_SEQ.fetch_add(1, Ordering::SeqCst);
                    let bucket = (seq % 10_000) as f64 / 10_000.0;
                    bucket < p
                }
            })
            .unwrap_or(true)
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut fields = self.context.take().unwrap_or_default();
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(elapsed_ms));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}

// =============================================================================
// Tests
// =============================================================================
