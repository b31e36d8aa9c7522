mod app;
mod calendar;
mod events;
mod help;
mod theme;
mod tooltip;
use crate::app::App;
use crate::calendar::{width_for, CalendarView, MonthPager, VisibleRange, WindowSize, YearMonth};
use crate::events::{EventIndex, LoadedEvents, YMD_FMT};
use anyhow::Context;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    events: Option<PathBuf>,
    range: VisibleRange,
    today: Option<Date>,
    /// `Some(true)` for `--narrow`, `Some(false)` for `--wide`, `None` to go by
    /// the terminal width at startup
    narrow: Option<bool>,
    log: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut events = None;
        let mut from = None;
        let mut to = None;
        let mut today = None;
        let mut narrow = None;
        let mut log = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('e') | Arg::Long("events") => {
                    events = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("from") => from = Some(parser.value()?.parse_with(YearMonth::parse)?),
                Arg::Long("to") => to = Some(parser.value()?.parse_with(YearMonth::parse)?),
                Arg::Long("today") => {
                    today = Some(
                        parser
                            .value()?
                            .parse_with(|s| Date::parse(s, &YMD_FMT))?,
                    );
                }
                Arg::Long("narrow") => narrow = Some(true),
                Arg::Long("wide") => narrow = Some(false),
                Arg::Long("log") => log = Some(PathBuf::from(parser.value()?)),
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        let defaults = VisibleRange::default();
        let range = VisibleRange::new(
            from.unwrap_or(defaults.first()),
            to.unwrap_or(defaults.last()),
        )
        .map_err(|e| lexopt::Error::Custom(Box::new(e)))?;
        Ok(Command::Run(RunOptions {
            events,
            range,
            today,
            narrow,
            log,
        }))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => opts.run(),
            Command::Help => {
                println!("Usage: acadcal [<options>]");
                println!();
                println!("Paged terminal academic calendar with per-day event popups");
                println!();
                println!("Options:");
                println!("  -e, --events FILE   Read events from the given JSON file");
                println!("  --from YYYY-MM      First month that can be shown [default: 2025-03]");
                println!("  --to YYYY-MM        Last month that can be shown [default: 2026-04]");
                println!("  --today YYYY-MM-DD  Treat the given date as today");
                println!("  --narrow            Show one month at a time");
                println!("  --wide              Show two months at a time");
                println!("  --log FILE          Write log messages to the given file");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunOptions {
    fn run(self) -> anyhow::Result<()> {
        if let Some(path) = &self.log {
            init_logging(path)?;
        }
        let today = match self.today {
            Some(d) => d,
            None => {
                OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date()
            }
        };
        let loaded = match &self.events {
            Some(path) => LoadedEvents::from_path(path)?,
            None => LoadedEvents {
                index: EventIndex::builtin(),
                rejected: Vec::new(),
            },
        };
        if loaded.index.is_empty() {
            tracing::warn!("No events to show");
        }
        let window = WindowSize::for_narrow(self.narrow.unwrap_or_else(terminal_is_narrow));
        tracing::info!(%today, ?window, "Starting calendar");
        let pager = MonthPager::new(self.range, window, today);
        let view = CalendarView::new(today, pager, loaded.index);
        with_terminal(|mut terminal| {
            terminal.hide_cursor().context("failed to hide cursor")?;
            App::new(view).run(terminal)?;
            Ok(())
        })?;
        for e in &loaded.rejected {
            eprintln!("acadcal: skipped {e}");
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Whether the terminal is too narrow for two months side by side.  If the
/// terminal size cannot be determined, it is assumed to be wide enough.
fn terminal_is_narrow() -> bool {
    match crossterm::terminal::size() {
        Ok((columns, _)) => columns < width_for(2),
        Err(e) => {
            tracing::warn!(error = %e, "Could not determine terminal size");
            false
        }
    }
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = execute!(io::stdout(), DisableFocusChange, DisableMouseCapture) {
        tracing::warn!(error = %e, "Failed to disable mouse capture");
    }
    ratatui::restore();
    r
}
