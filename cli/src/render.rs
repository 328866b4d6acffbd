use std::io::Write;

use cargo_bridge_core::api::{
    Category, JobResult, OutputFormat, OutputItem, OutputLine, OutputSink, FAILED_LINE,
    FINISHED_LINE,
};
use chrono::Utc;
use serde::Serialize;

pub struct TextMarkers {
    pub error: &'static str,
    pub warning: &'static str,
    pub action: &'static str,
    pub note: &'static str,
    pub ok: &'static str,
    pub fail: &'static str,
}

impl TextMarkers {
    pub fn unicode() -> Self {
        Self {
            error: "✗",
            warning: "⚠",
            action: "▶",
            note: "·",
            ok: "✓",
            fail: "✗",
        }
    }

    pub fn ascii() -> Self {
        Self {
            error: "[ERROR]",
            warning: "[WARN]",
            action: "[..]",
            note: "[NOTE]",
            ok: "[OK]",
            fail: "[FAIL]",
        }
    }

    fn for_category(&self, category: Category) -> Option<&'static str> {
        match category {
            Category::Error => Some(self.error),
            Category::Warning => Some(self.warning),
            Category::Action => Some(self.action),
            Category::Information => Some(self.note),
            Category::Standard => None,
        }
    }
}

#[derive(Serialize)]
struct JsonlEvent<'a> {
    v: u8,
    #[serde(rename = "type")]
    event_type: &'static str,
    job_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(flatten)]
    item: Option<&'a OutputItem>,
    #[serde(flatten)]
    result: Option<&'a JobResult>,
    ts: String,
}

/// Writes one job's output stream to a terminal or pipe.
pub struct Renderer<W: Write + Send> {
    out: W,
    job_id: String,
    format: OutputFormat,
    markers: TextMarkers,
    show_echo: bool,
}

impl<W: Write + Send> Renderer<W> {
    pub fn new(out: W, job_id: impl Into<String>, format: OutputFormat, ascii: bool) -> Self {
        Self {
            out,
            job_id: job_id.into(),
            format,
            markers: if ascii {
                TextMarkers::ascii()
            } else {
                TextMarkers::unicode()
            },
            show_echo: true,
        }
    }

    /// Hides the `<dir>> cargo ...` command echo. Status lines stay.
    pub fn with_show_echo(mut self, show_echo: bool) -> Self {
        self.show_echo = show_echo;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Summary after the job's final state is known.
    pub fn end(&mut self, result: &JobResult) {
        let written = match self.format {
            OutputFormat::Jsonl => write_json(
                &mut self.out,
                &JsonlEvent {
                    result: Some(result),
                    ..event(&self.job_id, "job.end")
                },
            ),
            OutputFormat::Text => {
                let marker = if result.is_success() {
                    self.markers.ok
                } else {
                    self.markers.fail
                };
                let detail = match &result.error {
                    Some(err) if !err.message.is_empty() => format!(": {}", err.message),
                    _ => String::new(),
                };
                writeln!(self.out, "{marker} {}{detail}", result.state)
            }
        };
        self.report(written);
    }

    fn write_text(&mut self, line: &OutputLine) -> std::io::Result<()> {
        match line {
            OutputLine::Echo { text } => writeln!(self.out, "{text}"),
            OutputLine::Item(item) => {
                let mut rendered = match self.markers.for_category(item.category) {
                    Some(marker) => format!("{marker} {}", item.text),
                    None => item.text.clone(),
                };
                if let (true, Some(loc)) = (item.activatable, &item.location) {
                    rendered.push_str(&format!("  [{loc}]"));
                }
                writeln!(self.out, "{rendered}")
            }
        }
    }

    fn report(&self, written: std::io::Result<()>) {
        if let Err(err) = written {
            tracing::debug!(error = %err, "failed to write output line");
        }
    }
}

fn event<'a>(job_id: &'a str, event_type: &'static str) -> JsonlEvent<'a> {
    JsonlEvent {
        v: 1,
        event_type,
        job_id,
        text: None,
        item: None,
        result: None,
        ts: Utc::now().to_rfc3339(),
    }
}

fn write_json<W: Write>(out: &mut W, event: &JsonlEvent<'_>) -> std::io::Result<()> {
    let line = serde_json::to_string(event)?;
    writeln!(out, "{line}")
}

fn is_status_line(text: &str) -> bool {
    text == FINISHED_LINE || text == FAILED_LINE
}

impl<W: Write + Send> OutputSink for Renderer<W> {
    fn append(&mut self, line: OutputLine) {
        if let OutputLine::Echo { text } = &line {
            if !self.show_echo && !is_status_line(text) {
                return;
            }
        }

        let written = match self.format {
            OutputFormat::Text => self.write_text(&line),
            OutputFormat::Jsonl => {
                let ev = match &line {
                    OutputLine::Echo { text } => JsonlEvent {
                        text: Some(text.as_str()),
                        ..event(&self.job_id, "output.echo")
                    },
                    OutputLine::Item(item) => JsonlEvent {
                        item: Some(item),
                        ..event(&self.job_id, "output.item")
                    },
                };
                write_json(&mut self.out, &ev)
            }
        };
        self.report(written);
    }
}
