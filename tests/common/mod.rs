#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use incident_deck::api::StaticDataSource;
use incident_deck::api::source::DataSource;
use incident_deck::tui::model::{DashboardCmd, DashboardModel, DashboardMsg};
use incident_deck::tui::runtime::perform_fetch;
use incident_deck::tui::update::update;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_ideck") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "ideck.exe" } else { "ideck" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve ideck binary path for integration test"),
    }
}

/// Write a config file under `dir` that keeps every path inside it.
pub fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    let body = format!(
        "[api]\nendpoint = \"http://127.0.0.1:9/api\"\npage_size = 25\n\n\
         [paths]\nactivity_log = {:?}\npreferences_file = {:?}\n",
        dir.join("activity.jsonl").display().to_string(),
        dir.join("preferences.json").display().to_string(),
    );
    fs::write(&path, body).expect("write test config");
    path
}

/// Run the binary with `args`, capturing output and leaving a log of the
/// run in the temp dir.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("ideck-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let output = Command::new(&bin_path)
        .args(args)
        .env_remove("DECK_OUTPUT_FORMAT")
        .env_remove("DECK_API_ENDPOINT")
        .env_remove("DECK_API_PAGE_SIZE")
        .env("NO_COLOR", "1")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute ideck command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Synchronous stand-in for the runtime: executes fetch commands inline
/// against `source` and feeds the results back until nothing is pending.
pub struct Driver {
    pub model: DashboardModel,
    pub source: StaticDataSource,
    pub recorded: Vec<String>,
}

impl Driver {
    pub fn new(model: DashboardModel, source: StaticDataSource) -> Self {
        Self {
            model,
            source,
            recorded: Vec::new(),
        }
    }

    /// Dispatch `msg` and drain every follow-up fetch.
    pub fn send(&mut self, msg: DashboardMsg) {
        let cmd = update(&mut self.model, msg);
        self.run(cmd);
    }

    /// Dispatch `msg` but hand back its fetches without executing them.
    pub fn send_deferred(&mut self, msg: DashboardMsg) -> Vec<DashboardMsg> {
        let cmd = update(&mut self.model, msg);
        self.collect(cmd)
    }

    pub fn run(&mut self, cmd: DashboardCmd) {
        let mut pending = self.collect(cmd);
        while let Some(msg) = (!pending.is_empty()).then(|| pending.remove(0)) {
            let cmd = update(&mut self.model, msg);
            pending.extend(self.collect(cmd));
        }
    }

    fn collect(&mut self, cmd: DashboardCmd) -> Vec<DashboardMsg> {
        let mut out = Vec::new();
        for cmd in cmd.flatten() {
            match cmd {
                DashboardCmd::Fetch { view, cmd } => {
                    let source: &dyn DataSource = &self.source;
                    out.extend(perform_fetch(source, view, cmd));
                }
                DashboardCmd::Record(entry) => self.recorded.push(entry.event.summary()),
                DashboardCmd::None | DashboardCmd::Quit | DashboardCmd::Batch(_) => {}
            }
        }
        out
    }
}
