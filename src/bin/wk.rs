extern crate workcal as lib;

use flexi_logger::{FileSpec, Logger};
use lib::events::Dispatcher;
use lib::grid::{build_year, WeekStart};
use lib::lunar::ChineseCalendar;
use lib::ui::app::App;
use lib::ui::plain::render_year;
use nix::sys::{signal, termios};
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use termion::input::MouseTerminal;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "wk",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Workcal - A TUI work day calendar with lunar dates."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the year non-interactively"
    )]
    pub show: bool,

    #[structopt(short = "y", long = "year", help = "year to show first")]
    pub year: Option<i32>,

    #[structopt(short = "m", long = "monday", help = "start weeks on monday")]
    pub monday: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if let Some(year) = args.year {
        config.year = Some(year);
    }
    if args.monday {
        config.week_start = WeekStart::Monday;
    }

    if args.show {
        let grid = build_year(&ChineseCalendar, config.initial_year(), config.week_start)?;
        println!("{}", render_year(&grid, &config.day_types()));
        return Ok(());
    }

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(
        termios::tcgetattr(STDOUT).expect("Failed to get terminal attributes"),
    );

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &orig_attr.lock().unwrap());

        println!("Workcal ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    // Only the dispatcher's signal thread picks up SIGWINCH.
    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);
    signals_to_wait.thread_block()?;

    let mut app = App::new(&config)?;

    let dispatcher = Dispatcher::from_config(&config, signals_to_wait);

    // Mouse reporting stays on until the guard is dropped, after the terminal
    // has been restored.
    let _mouse = MouseTerminal::from(stdout());

    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    app.run(dispatcher, term)
}
