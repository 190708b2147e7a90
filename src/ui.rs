//! Human-readable event output

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;

use sitepipe::PipelineEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Progress,
    Arrow,
    Watch,
    Server,
    Reload,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => "✓",
            (true, Icon::Error) => "✗",
            (true, Icon::Warning) => "⚠",
            (true, Icon::Progress) => "●",
            (true, Icon::Arrow) => "↳",
            (true, Icon::Watch) => "⟳",
            (true, Icon::Server) => "🌐",
            (true, Icon::Reload) => "↻",
            (false, Icon::Success) => "[OK]",
            (false, Icon::Error) => "[FAIL]",
            (false, Icon::Warning) => "[WARN]",
            (false, Icon::Progress) => "[..]",
            (false, Icon::Arrow) => "[>]",
            (false, Icon::Watch) => "[~]",
            (false, Icon::Server) => "[HTTP]",
            (false, Icon::Reload) => "[R]",
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => Color::Green,
            Icon::Error => Color::Red,
            Icon::Warning | Icon::Progress => Color::Yellow,
            Icon::Arrow | Icon::Reload => Color::DarkGrey,
            Icon::Watch | Icon::Server => Color::Cyan,
        };
        format!("{}", s.with(color))
    }
}

/// What the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub color: bool,
    pub unicode: bool,
}

pub fn detect_capabilities() -> Capabilities {
    detect_capabilities_impl(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
}

fn detect_capabilities_impl(get_env: impl Fn(&str) -> Option<String>, is_tty: bool) -> Capabilities {
    let term = get_env("TERM").unwrap_or_default();
    let term_is_dumb = term.eq_ignore_ascii_case("dumb");
    let no_color = get_env("NO_COLOR").is_some();

    let locale_is_ascii = ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|k| get_env(k))
        .next()
        .is_some_and(|v| {
            let v = v.to_lowercase();
            v == "c" || v == "posix"
        });

    Capabilities {
        color: is_tty && !term_is_dumb && !no_color,
        unicode: !term_is_dumb && !locale_is_ascii,
    }
}

/// Local wall-clock time for event prefixes
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

pub fn render_event(
    timestamp: &str,
    event: &PipelineEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = format!("[{}]", timestamp);
    let icon = |icon: Icon| icon.colored(supports_color, supports_unicode);

    match event {
        PipelineEvent::TaskStarted { task } => {
            format!("{} {} {}...\n", prefix, icon(Icon::Progress), task)
        }
        PipelineEvent::TaskFinished {
            task,
            written,
            elapsed_ms,
        } => {
            let files = if *written == 1 { "file" } else { "files" };
            format!(
                "{} {} {}: {} {} in {}ms\n",
                prefix,
                icon(Icon::Success),
                task,
                written,
                files,
                elapsed_ms
            )
        }
        PipelineEvent::TaskFailed { task, message } => {
            format!("{} {} {} failed: {}\n", prefix, icon(Icon::Error), task, message)
        }
        PipelineEvent::TaskIsolated { task, message } => format!(
            "{} {} {} failed (still watching): {}\n",
            prefix,
            icon(Icon::Warning),
            task,
            message
        ),
        PipelineEvent::ServerStarted { url } => {
            format!("{} {} Serving: {}\n", prefix, icon(Icon::Server), url)
        }
        PipelineEvent::WatchStarted { source } => format!(
            "{} {} Watching: {} (Ctrl+C to stop)\n",
            prefix,
            icon(Icon::Watch),
            source
        ),
        PipelineEvent::FileChanged { path } => {
            format!("{} {} Changed: {}\n", prefix, icon(Icon::Arrow), path)
        }
        PipelineEvent::ReloadPushed { kind, path } => match path {
            Some(path) => format!("{} {} Reload {}: {}\n", prefix, icon(Icon::Reload), kind, path),
            None => format!("{} {} Reload\n", prefix, icon(Icon::Reload)),
        },
        PipelineEvent::Shutdown => {
            format!("\n{} {} Stopped.\n", prefix, icon(Icon::Watch))
        }
    }
}
