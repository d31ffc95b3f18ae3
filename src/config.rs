use crate::catalog::{Application, Catalog, Variant};
use anyhow::{Context, Result};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const APPS_FILE: &str = "apps.conf";
pub const ENV_FILE: &str = "env.conf";
pub const BACKGROUND_FILE: &str = "bg.png";

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Directory holding the launcher executable; every config file lives next to it.
pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub base: PathBuf,
    pub apps: PathBuf,
    pub env: PathBuf,
    pub background: PathBuf,
}

impl ConfigPaths {
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            apps: base.join(APPS_FILE),
            env: base.join(ENV_FILE),
            background: base.join(BACKGROUND_FILE),
            base,
        }
    }

    /// Icon references are relative to the config directory unless absolute.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.base.join(reference)
    }
}

// ── Parse reports ─────────────────────────────────────────────────────────────

/// A problem confined to one line or record. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub line: usize,
    pub message: String,
}

impl ConfigIssue {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub issues: Vec<ConfigIssue>,
}

fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// ── Applications ──────────────────────────────────────────────────────────────

/// Parse the applications file.
///
/// Records are separated by blank lines:
///
/// ```text
/// <name>
/// <icon>
/// <variant label>     (zero or more label/command pairs)
/// <variant command>
/// ```
///
/// A record cut short before its icon line, or one whose last variant label
/// has no command, is dropped and reported. A record without any variant gets
/// a single variant named after the application with an empty command.
pub fn parse_applications(text: &str) -> Parsed<Vec<Application>> {
    let mut lines = numbered_lines(text).peekable();
    let mut applications = Vec::new();
    let mut issues = Vec::new();

    'records: loop {
        while lines.next_if(|(_, line)| is_blank(line)).is_some() {}
        let Some((name_line, name)) = lines.next() else {
            break;
        };
        let icon = match lines.next() {
            Some((_, icon)) if !is_blank(icon) => icon,
            _ => {
                issues.push(ConfigIssue::new(
                    name_line,
                    format!("application '{name}' has no icon line; record skipped"),
                ));
                continue;
            }
        };

        let mut variants = Vec::new();
        while let Some((label_line, label)) = lines.next_if(|(_, line)| !is_blank(line)) {
            match lines.next_if(|(_, line)| !is_blank(line)) {
                Some((_, command)) => variants.push(Variant::new(label, command)),
                None => {
                    issues.push(ConfigIssue::new(
                        label_line,
                        format!(
                            "variant '{label}' of application '{name}' has no command line; record skipped"
                        ),
                    ));
                    continue 'records;
                }
            }
        }
        if variants.is_empty() {
            variants.push(Variant::new(name, ""));
        }

        applications.push(Application {
            name: name.to_string(),
            icon_reference: icon.to_string(),
            variants,
        });
    }

    Parsed {
        value: applications,
        issues,
    }
}

/// Read and parse the applications file. Failing to read it, or ending up
/// with nothing to show, is fatal.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading applications config {}", path.display()))?;
    let parsed = parse_applications(&text);
    for issue in &parsed.issues {
        warn!(file = %path.display(), "{issue}");
    }
    for app in &parsed.value {
        for variant in &app.variants {
            debug!(
                app = %app.name,
                variant = %variant.label,
                command = %variant.command_line,
                "parsed variant"
            );
        }
    }
    Catalog::new(parsed.value).with_context(|| format!("loading {}", path.display()))
}

// ── Environment overlay ───────────────────────────────────────────────────────

/// `key=value` assignments applied to the process environment before the
/// first window opens. Keeps first-seen order; later duplicates win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    entries: Vec<(String, String)>,
}

impl EnvOverlay {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

pub fn parse_environment(text: &str) -> Parsed<EnvOverlay> {
    let mut overlay = EnvOverlay::default();
    let mut issues = Vec::new();
    for (line_no, line) in numbered_lines(text) {
        if is_blank(line) {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            issues.push(ConfigIssue::new(line_no, "expected key=value; line skipped"));
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains('\0') || value.contains('\0') {
            issues.push(ConfigIssue::new(
                line_no,
                "invalid environment variable name or value; line skipped",
            ));
            continue;
        }
        overlay.insert(key, value);
    }
    Parsed {
        value: overlay,
        issues,
    }
}

/// Read the optional environment file. A missing file yields an empty overlay;
/// any other read failure is logged and treated the same way.
pub fn load_env_overlay(path: &Path) -> EnvOverlay {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return EnvOverlay::default(),
        Err(err) => {
            warn!(file = %path.display(), "cannot read environment config: {err}");
            return EnvOverlay::default();
        }
    };
    let parsed = parse_environment(&text);
    for issue in &parsed.issues {
        warn!(file = %path.display(), "{issue}");
    }
    parsed.value
}

/// Apply every assignment to this process's environment. Returns how many
/// were applied.
pub fn apply_env_overlay(overlay: &EnvOverlay) -> usize {
    let mut applied = 0;
    for (key, value) in overlay.iter() {
        // set_var panics on these; parse_environment already filters them out
        if key.is_empty() || key.contains('=') || key.contains('\0') || value.contains('\0') {
            warn!(key, "skipping invalid environment assignment");
            continue;
        }
        std::env::set_var(key, value);
        info!(key, "environment variable set");
        applied += 1;
    }
    applied
}
