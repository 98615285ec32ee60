//! Interactive session loop
//!
//! Reads commands line by line and drives one [`BmiForm`]. The debounce
//! deadline is raced against the next input line, so a pending recompute
//! fires on time even while the terminal is idle.

use bmi_calculator_shared::{BmiForm, ViewAdapter};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::commands::Command;
use crate::config::AppConfig;
use crate::error::CliError;
use crate::terminal::{TerminalView, TokioClock};

type TerminalForm = BmiForm<TokioClock, TerminalView>;

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands executed, including rejected ones
    pub commands: usize,
    /// Commands that produced an error line
    pub errors: usize,
    /// Records written to the output
    pub records: usize,
}

/// Run a session until end of input or `quit`.
///
/// A recompute still pending at that point is flushed before returning.
pub async fn run_session<R, W>(
    input: R,
    output: &mut W,
    config: &AppConfig,
) -> Result<SessionSummary, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let clock = TokioClock::new();
    let view = TerminalView::new(config.output.format);
    let mut form = BmiForm::new(&config.form, clock, view);
    let mut summary = SessionSummary::default();
    let mut lines = input.lines();
    debug!(
        window_ms = form.debounce_window().as_millis() as u64,
        format = ?config.output.format,
        "session started"
    );

    write_pending(&mut form, output, &mut summary).await?;

    loop {
        let deadline = form.next_deadline().map(|at| clock.instant_at(at));

        tokio::select! {
            biased;

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                form.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("end of input");
                    break;
                };
                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => {
                        summary.commands += 1;
                        break;
                    }
                    Ok(Some(command)) => {
                        summary.commands += 1;
                        if let Err(err) = apply(&mut form, command) {
                            report(&mut form, &mut summary, err)?;
                        }
                    }
                    Err(err) => {
                        summary.commands += 1;
                        report(&mut form, &mut summary, err)?;
                    }
                }
            }
        }

        write_pending(&mut form, output, &mut summary).await?;
    }

    if form.flush() {
        debug!("flushed pending recompute");
    }
    write_pending(&mut form, output, &mut summary).await?;
    output.flush().await?;

    info!(
        commands = summary.commands,
        errors = summary.errors,
        records = summary.records,
        "Session finished"
    );
    Ok(summary)
}

fn apply(form: &mut TerminalForm, command: Command) -> Result<(), CliError> {
    match command {
        Command::Unit(unit_system) => {
            if !form.set_unit_system(unit_system) {
                debug!(%unit_system, "unit system unchanged");
            }
        }
        Command::Input { field, text } => form.input(field, &text)?,
        Command::Blur(field) => form.blur(field)?,
        Command::Show => {
            let snapshot = form.snapshot();
            form.view_adapter_mut().render(&snapshot);
        }
        Command::Flush => {
            form.flush();
        }
        Command::Quit => {}
    }
    Ok(())
}

fn report(form: &mut TerminalForm, summary: &mut SessionSummary, err: CliError) -> Result<(), CliError> {
    if !err.is_recoverable() {
        return Err(err);
    }
    summary.errors += 1;
    form.view_adapter_mut().report_error(&err.to_string());
    Ok(())
}

async fn write_pending<W>(
    form: &mut TerminalForm,
    output: &mut W,
    summary: &mut SessionSummary,
) -> Result<(), CliError>
where
    W: AsyncWrite + Unpin,
{
    for record in form.view_adapter_mut().drain() {
        output.write_all(record.as_bytes()).await?;
        output.write_all(b"\n").await?;
        summary.records += 1;
    }
    Ok(())
}
