//! Per-decode anomaly collection and report rendering.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use smart_json_path::CodingPath;

use crate::item::{LogContainer, LogItem, LogKind};
use crate::level::{debug_level, log_handler, DebugLevel};

const INDENT: &str = "    ";
const RULE_WIDTH: usize = 64;

/// Collects the anomalies of one top-level decode call.
///
/// Each instance is one session with its own random token; instances are
/// never shared between decode calls.
#[derive(Debug)]
pub struct Sentinel {
    session: String,
    level: DebugLevel,
    items: Vec<LogItem>,
    types: HashMap<CodingPath, String>,
    muted: usize,
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl Sentinel {
    /// Starts a session at the process-wide debug level.
    pub fn new() -> Self {
        Self::with_level(debug_level())
    }

    pub fn with_level(level: DebugLevel) -> Self {
        let token: u32 = rand::thread_rng().gen();
        Self {
            session: format!("{token:08x}"),
            level,
            items: Vec::new(),
            types: HashMap::new(),
            muted: 0,
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn level(&self) -> DebugLevel {
        self.level
    }

    /// `false` means callers must not build log records at all.
    pub fn is_enabled(&self) -> bool {
        self.level != DebugLevel::None && self.muted == 0
    }

    /// Suspends recording until the matching [`Sentinel::unmute`].
    pub fn mute(&mut self) {
        self.muted += 1;
    }

    pub fn unmute(&mut self) {
        self.muted = self.muted.saturating_sub(1);
    }

    /// Announces the type being decoded at `path`, used to annotate headers.
    pub fn note_container(&mut self, path: &CodingPath, type_name: &str) {
        if self.is_enabled() && !self.types.contains_key(path) {
            self.types.insert(path.clone(), type_name.to_owned());
        }
    }

    pub fn record(&mut self, item: LogItem) {
        if !self.is_enabled() {
            return;
        }
        if self.level == DebugLevel::Alert && !item.kind.is_alert() {
            return;
        }
        tracing::debug!(
            session = %self.session,
            path = %item.path,
            field = %item.field,
            kind = %item.kind,
            "decoding anomaly"
        );
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[LogItem] {
        &self.items
    }

    /// Groups items by container path, drops duplicates and sorts the
    /// containers by path.
    ///
    /// Two items are duplicates when they share the container path, the
    /// field and the kind. Items from different array elements live in
    /// different containers and are never merged.
    pub fn containers(&self) -> Vec<LogContainer> {
        let mut order: Vec<CodingPath> = Vec::new();
        let mut groups: HashMap<CodingPath, Vec<LogItem>> = HashMap::new();
        let mut seen: HashSet<(CodingPath, String, LogKind)> = HashSet::new();
        for item in &self.items {
            let key = (item.path.clone(), item.field.clone(), item.kind);
            if !seen.insert(key) {
                continue;
            }
            let group = groups.entry(item.path.clone()).or_insert_with(|| {
                order.push(item.path.clone());
                Vec::new()
            });
            group.push(item.clone());
        }
        order.sort_by(|a, b| a.path_cmp(b));
        order
            .into_iter()
            .map(|path| {
                let items = groups.remove(&path).unwrap_or_default();
                let type_name = self.types.get(&path).cloned();
                LogContainer {
                    path,
                    type_name,
                    items,
                }
            })
            .collect()
    }

    /// Renders the session report and purges the session state, whether or
    /// not anything was recorded. Returns `None` when there was nothing to
    /// report.
    pub fn format_logs(&mut self) -> Option<String> {
        let report = if self.items.is_empty() {
            None
        } else {
            Some(self.render())
        };
        self.items.clear();
        self.types.clear();
        report
    }

    /// Formats the report and hands it to the registered handler, or to
    /// `tracing` when none is registered.
    pub fn emit(&mut self) {
        let Some(report) = self.format_logs() else {
            return;
        };
        match log_handler() {
            Some(handler) => handler(&report),
            None => tracing::warn!(target: "smart_json::sentinel", session = %self.session, "\n{report}"),
        }
    }

    fn render(&self) -> String {
        let containers = self.containers();
        let title = format!(" smart-json sentinel · session {} ", self.session);
        let pad = RULE_WIDTH.saturating_sub(title.chars().count());
        let mut out = String::new();
        out.push_str(&"=".repeat(pad / 2));
        out.push_str(&title);
        out.push_str(&"=".repeat(pad - pad / 2));
        out.push('\n');

        let root = CodingPath::new();
        out.push_str(self.types.get(&root).map(String::as_str).unwrap_or("<root>"));
        out.push('\n');

        let mut previous = root;
        for container in &containers {
            let keys = container.path.keys();
            let shared = container.path.common_prefix_len(&previous);
            for depth in shared..keys.len() {
                let prefix = CodingPath::from(keys[..=depth].to_vec());
                out.push_str(&INDENT.repeat(depth + 1));
                out.push_str(&keys[depth].to_string());
                if let Some(type_name) = self.types.get(&prefix) {
                    out.push_str(": ");
                    out.push_str(type_name);
                }
                out.push('\n');
            }
            let width = container.field_width();
            let indent = INDENT.repeat(keys.len() + 1);
            for item in &container.items {
                out.push_str(&indent);
                out.push_str(&item.field);
                out.push_str(&" ".repeat(width - item.field.chars().count()));
                out.push_str(" : ");
                out.push_str(&item.description);
                out.push('\n');
            }
            previous = container.path.clone();
        }
        out.push_str(&"=".repeat(RULE_WIDTH));
        out
    }
}
