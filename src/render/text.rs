use crate::channel::ChannelState;
use crate::config::reconstruct::coerce;
use crate::config::{FieldPath, FlatField, field_description};
use crate::logs::LogTail;
use crate::schema::Kind;
use crate::status::{EntitySnapshot, EntityStatus};
use std::fmt::Write;

/// Which lifecycle controls make sense for a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionAvailability {
    pub start: bool,
    pub stop: bool,
    pub restart: bool,
}

impl ActionAvailability {
    pub fn for_status(status: &EntityStatus) -> Self {
        let running = status.is_running();
        Self {
            start: !running,
            stop: running,
            restart: running,
        }
    }
}

pub fn status_badge(status: &EntityStatus) -> String {
    match status {
        EntityStatus::Running => "● running".to_string(),
        EntityStatus::Stopped => "○ stopped".to_string(),
        EntityStatus::Error(msg) => format!("! {}", msg),
    }
}

pub fn connection_line(state: ChannelState) -> &'static str {
    match state {
        ChannelState::Disconnected => "disconnected, retrying",
        ChannelState::Connecting => "connecting",
        ChannelState::Open => "live",
    }
}

/// Fleet overview: a header with the bot count and one row per bot.
pub fn fleet_table(entities: &[EntitySnapshot]) -> String {
    let mut out = String::new();
    let noun = if entities.len() == 1 { "bot" } else { "bots" };
    let _ = writeln!(out, "{} {}", entities.len(), noun);

    if entities.is_empty() {
        out.push_str("No bots yet. Create one with `fleet-console create`.\n");
        return out;
    }

    let name_w = entities
        .iter()
        .map(|e| e.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let id_w = entities.iter().map(|e| e.id.len()).max().unwrap_or(0).max(2);

    let _ = writeln!(
        out,
        "{:<name_w$}  {:<id_w$}  {:<12}  {:>7}  {:>10}",
        "NAME", "ID", "STATUS", "CPU", "RAM"
    );
    for e in entities {
        let _ = writeln!(
            out,
            "{:<name_w$}  {:<id_w$}  {:<12}  {:>6}%  {:>7} MB",
            e.display_name(),
            e.id,
            status_badge(&e.status),
            e.cpu_percent,
            e.memory_mb
        );
    }
    out
}

/// Detail card for one bot.
pub fn detail_card(e: &EntitySnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", e.display_name(), status_badge(&e.status));
    let _ = writeln!(out, "  id:      {}", e.id);
    let pid = e
        .process_id
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "  pid:     {}", pid);
    let _ = writeln!(out, "  cpu:     {}%", e.cpu_percent);
    let _ = writeln!(out, "  memory:  {} MB", e.memory_mb);
    if let Some(started) = &e.started_at {
        let _ = writeln!(out, "  started: {}", started);
    }

    let avail = ActionAvailability::for_status(&e.status);
    let mut actions = Vec::new();
    if avail.start {
        actions.push("start");
    }
    if avail.stop {
        actions.push("stop");
    }
    if avail.restart {
        actions.push("restart");
    }
    actions.push("delete");
    let _ = writeln!(out, "  actions: {}", actions.join(", "));
    out
}

/// Human label for a field: last segment, underscores to spaces, capitalized.
pub fn field_label(path: &FieldPath) -> String {
    let raw = path.last().unwrap_or_default().replace('_', " ");
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn kind_tag(kind: Kind) -> &'static str {
    match kind {
        Kind::Boolean => "bool",
        Kind::Integer => "int",
        Kind::Number => "number",
        Kind::String => "text",
        Kind::Array => "list",
        Kind::Object => "json",
        Kind::Dict => "rules",
    }
}

fn help_suffix(path: &FieldPath) -> String {
    field_description(path)
        .map(|d| format!("  # {}", d))
        .unwrap_or_default()
}

/// Editable field listing. Scalar-group members are indented under a group
/// header; multi-line values are shown as indented blocks.
pub fn config_form(fields: &[FlatField]) -> String {
    let mut out = String::new();
    let mut open_group: Option<&FieldPath> = None;

    for f in fields {
        if f.group() != open_group {
            if let Some(group) = f.group() {
                let _ = writeln!(out, "[{}] {}", group, field_label(group));
            }
            open_group = f.group();
        }
        let indent = if f.group().is_some() { "  " } else { "" };
        let tag = kind_tag(f.schema().kind());
        let help = help_suffix(f.path());

        if f.input().contains('\n') || matches!(f.schema().kind(), Kind::Array | Kind::Dict) {
            let _ = writeln!(
                out,
                "{indent}{} ({}) <{}>:{help}",
                f.path(),
                field_label(f.path()),
                tag
            );
            for line in f.input().lines() {
                let _ = writeln!(out, "{indent}    {}", line);
            }
        } else {
            let _ = writeln!(
                out,
                "{indent}{} ({}) <{}> = {}{help}",
                f.path(),
                field_label(f.path()),
                tag,
                f.input()
            );
        }
    }
    out
}

/// Everything known about one field, for `config show <id> <path>`.
pub fn field_detail(f: &FlatField) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", field_label(f.path()));
    let _ = writeln!(out, "  path:  {}", f.path());
    let _ = writeln!(out, "  kind:  {}", kind_tag(f.schema().kind()));
    if let Some(group) = f.group() {
        let _ = writeln!(out, "  group: {}", group);
    }
    if let Some(desc) = field_description(f.path()) {
        let _ = writeln!(out, "  help:  {}", desc);
    }
    let _ = writeln!(out, "  value:");
    for line in f.input().lines() {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

/// One `path: old -> new` line per edited field, values as JSON.
pub fn config_changes<'a>(fields: impl IntoIterator<Item = &'a FlatField>) -> String {
    let mut out = String::new();
    for f in fields {
        let _ = writeln!(
            out,
            "{}: {} -> {}",
            f.path(),
            f.value(),
            coerce(f.schema(), f.input())
        );
    }
    if out.is_empty() {
        out.push_str("no changes\n");
    }
    out
}

/// Visible window of a log tail plus a status footer. `unseen` counts lines
/// that arrived below the window while scrolled back.
pub fn log_pane(tail: &LogTail, unseen: usize) -> String {
    let mut out = String::new();
    if tail.buffer().is_empty() {
        out.push_str("(no log lines yet)\n");
    }
    for line in tail.visible() {
        out.push_str(line);
        out.push('\n');
    }

    let total = tail.buffer().len();
    let first = tail.viewport().offset;
    let last = (first + tail.viewport().height).min(total);
    let _ = write!(
        out,
        "[{}] rows {}-{} of {}",
        connection_line(tail.state()),
        if total == 0 { 0 } else { first + 1 },
        last,
        total
    );
    if unseen > 0 {
        let _ = write!(out, ", {} new below", unseen);
    }
    out.push_str("  (k/j line, u/d page, b bottom, c clear, q quit)\n");
    out
}
