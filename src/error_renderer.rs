//! Error rendering using ariadne
//!
//! Execution errors are reported against the program listing: the listing is
//! the source text, the failing instruction's line carries the label, and a
//! help note explains what the error kind usually means.

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

use stackloop_core::vm::{ErrorKind, ExecutionError, Program};

const SOURCE_ID: &str = "<program>";

/// Render an execution error to stderr
///
/// # Example
/// ```no_run
/// use stackloop::{Program, VM, render_error};
///
/// let program = Program::from_listing("Bin Add\nEnd\n").unwrap();
/// if let Err(e) = VM::execute(&program) {
///     render_error(&e, &program);
/// }
/// ```
pub fn render_error(error: &ExecutionError, program: &Program) {
    render_error_to_writer(error, program, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(
    error: &ExecutionError,
    program: &Program,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(error, program, writer, true)
}

/// Render an error to a String (useful for tests, web UIs, etc.)
pub fn render_error_to_string(error: &ExecutionError, program: &Program) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, program, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &ExecutionError, program: &Program) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, program, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn help(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::SlotOutOfRange => {
            "slots are stack positions counted from the bottom; start the machine with more slots or bind the slot with a leading value"
        }
        ErrorKind::StackUnderflow => "an instruction needed more operands than the stack held",
        ErrorKind::InvalidJumpTarget => "jump targets are absolute and must name an instruction of this program",
        ErrorKind::MissingEnd => "every program must finish with an End instruction",
        ErrorKind::StepLimitExceeded => "the program may loop forever; raise the step limit if it is just long",
    }
}

/// The span to label, and what to say there.
fn label_for(error: &ExecutionError, program: &Program) -> Option<(Range<usize>, String)> {
    let ip = error.ip();
    if let Some(span) = program.line_span(ip) {
        let instruction = program.instructions[ip];
        return Some((span, format!("`{instruction}` failed here")));
    }
    // Ran off the end: point at the last instruction that did run.
    let last = ip.checked_sub(1)?;
    let span = program.line_span(last)?;
    Some((span, "execution continued past this instruction".to_string()))
}

fn render_error_to_writer(
    error: &ExecutionError,
    program: &Program,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let source = program.to_string();
    let kind = error.kind();
    let label = label_for(error, program);

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let anchor = label.as_ref().map_or(0..0, |(span, _)| span.clone());
    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, anchor))
        .with_code(kind.name())
        .with_message(error.to_string())
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some((span, message)) = label {
        report = report.with_label(
            Label::new((SOURCE_ID, span))
                .with_message(message)
                .with_color(colors.next()),
        );
    }

    report = report.with_help(help(kind));

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}
