//! Structured JSON-lines logging.
//!
//! Every record carries a run id, a monotonically increasing sequence number,
//! a level and a domain so a session can be replayed from its log alone.
//! Records go to stderr; with `LOG_DIR` set they are also written under
//! `<LOG_DIR>/<run_id>/`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

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
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::parse(&v))
            .unwrap_or(Level::Info)
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
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Model,      // Aggregate construction, summaries
    Generator,  // Mock data batches
    Navigation, // State machine transitions
    Drilldown,  // Controller entry points
    Report,     // Distribution report
    System,     // Startup, config, shutdown
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Model => "model",
            Domain::Generator => "generator",
            Domain::Navigation => "navigation",
            Domain::Drilldown => "drilldown",
            Domain::Report => "report",
            Domain::System => "system",
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
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    files: Option<RunFiles>,
}

/// Per-run log files under `<base>/<run_id>/`.
#[derive(Debug)]
pub struct RunFiles {
    pub dir: PathBuf,
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
}

impl RunFiles {
    pub fn open(base: &Path, run_id: &str) -> io::Result<Self> {
        let dir = base.join(run_id);
        create_dir_all(&dir)?;
        std::fs::write(
            dir.join("manifest.json"),
            json!({
                "run_id": run_id,
                "ts": ts_now(),
                "pid": process::id(),
            })
            .to_string(),
        )?;
        Ok(Self {
            events: Mutex::new(BufWriter::new(File::create(dir.join("events.jsonl"))?)),
            trace: Mutex::new(BufWriter::new(File::create(dir.join("trace.jsonl"))?)),
            dir,
        })
    }

    pub fn write(&self, level: Level, line: &str) {
        let writer = match level {
            Level::Trace | Level::Debug => &self.trace,
            _ => &self.events,
        };
        if let Ok(mut w) = writer.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let files = std::env::var("LOG_DIR").ok().and_then(|base| {
            RunFiles::open(Path::new(&base), &run_id)
                .map_err(|err| eprintln!("[log] failed to open run dir: {}", err))
                .ok()
        });
        RunContext { run_id, files }
    })
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let ctx = ensure_run_context();
    let line = render_record(&ctx.run_id, next_seq(), level, domain, event, fields);
    if let Some(files) = &ctx.files {
        files.write(level, &line);
    }
    eprintln!("{}", line);
}

fn render_record(
    run_id: &str,
    seq: u64,
    level: Level,
    domain: Domain,
    event: &str,
    mut fields: Map<String, Value>,
) -> String {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(seq));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_model_built(years: usize, total_files: u64, total_size: u64, seeded: bool) {
    log(
        Level::Info,
        Domain::Model,
        "model_built",
        obj(&[
            ("years", json!(years)),
            ("total_files", json!(total_files)),
            ("total_size", json!(total_size)),
            ("total_gb", v_num(total_size as f64 / (1u64 << 30) as f64)),
            ("seeded", json!(seeded)),
        ]),
    );
}

pub fn log_files_generated(year: i32, month: u32, count: usize, largest: u64) {
    log(
        Level::Debug,
        Domain::Generator,
        "files_generated",
        obj(&[
            ("year", json!(year)),
            ("month", json!(month)),
            ("count", json!(count)),
            ("largest", json!(largest)),
        ]),
    );
}

pub fn log_transition(event: &str, view: &str, state_hash: u64, seq: u64) {
    log(
        Level::Info,
        Domain::Navigation,
        "transition",
        obj(&[
            ("event", v_str(event)),
            ("view", v_str(view)),
            ("state_hash", v_str(&format!("{:x}", state_hash))),
            ("seq", json!(seq)),
        ]),
    );
}

/// Lookup misses are expected from stale chart payloads; debug only.
pub fn log_ignored(event: &str, reason: &str) {
    log(
        Level::Debug,
        Domain::Drilldown,
        "ignored",
        obj(&[("event", v_str(event)), ("reason", v_str(reason))]),
    );
}

pub fn log_report_rendered(rows: usize, expanded_years: usize) {
    log(
        Level::Info,
        Domain::Report,
        "report_rendered",
        obj(&[
            ("rows", json!(rows)),
            ("expanded_years", json!(expanded_years)),
        ]),
    );
}

pub fn log_session_summary(steps: usize, applied: usize, ignored: usize, final_view: &str) {
    log(
        Level::Info,
        Domain::System,
        "session_summary",
        obj(&[
            ("steps", json!(steps)),
            ("applied", json!(applied)),
            ("ignored", json!(ignored)),
            ("final_view", v_str(final_view)),
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
// Tests
// =============================================================================
