//! Line-driven console host for a slide deck.
//!
//! Each stdin line is a key value (`ArrowRight`, `Space`, `f`, ...), a route starting with
//! `/`, `snapshot`, or `quit`. Snapshots are printed to stdout as JSON lines; collaborator
//! calls are logged to stderr.

use std::{cell::Cell, env, error::Error, fs, process, rc::Rc, thread};

use futures::{channel::mpsc, executor::LocalPool, StreamExt};
use slide_nav::{
    keyboard::KeyEvent,
    route::{RoutePort, SlidePath},
    utils::timer::SystemClock,
    NavigationController, NavigationSnapshot, PlatformError, Ports, Presentation, Slide,
    SlideRenderer, Timings, Viewport,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
slide-nav: keyboard-driven slide deck navigator

USAGE:
    slide-nav [OPTIONS]

OPTIONS:
    --deck=PATH       JSON deck: a list of slides or {\"slides\": [...]}
    --slides=N        Number of placeholder slides when no deck is given (default: 10)
    --timings=PATH    JSON file overriding settle delays and the auto-play interval
    --start=ROUTE     Initial route, e.g. /slide/3
    --help, -h        Show this help message
    --version, -V     Show version

INPUT (one per line):
    ArrowRight, Space, PageDown    Next slide
    ArrowLeft, PageUp              Previous slide
    Home, End                      First or last slide
    f, Escape                      Toggle fullscreen
    r                              Reset to the first slide
    p                              Toggle auto-play
    /slide/N                       Navigate as if the route changed
    snapshot                       Print the current state
    quit                           Exit

ENVIRONMENT VARIABLES:
    SLIDE_NAV_DECK       Override --deck
    SLIDE_NAV_SLIDES     Override --slides
    SLIDE_NAV_TIMINGS    Override --timings
    SLIDE_NAV_START      Override --start
    RUST_LOG             Log filter (default: info)";

#[derive(Debug, PartialEq)]
struct Opts {
    deck: Option<String>,
    slides: usize,
    timings: Option<String>,
    start: Option<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            deck: None,
            slides: 10,
            timings: None,
            start: None,
        }
    }
}

enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Environment variables override defaults; explicit flags override both.
    fn parse(
        args: impl IntoIterator<Item = String>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Parsed, String> {
        let mut opts = Self::default();
        if let Some(val) = var("SLIDE_NAV_DECK") {
            opts.deck = Some(val);
        }
        if let Some(n) = var("SLIDE_NAV_SLIDES").and_then(|val| val.parse().ok()) {
            opts.slides = n;
        }
        if let Some(val) = var("SLIDE_NAV_TIMINGS") {
            opts.timings = Some(val);
        }
        if let Some(val) = var("SLIDE_NAV_START") {
            opts.start = Some(val);
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--deck=") {
                        opts.deck = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--slides=") {
                        opts.slides = val
                            .parse()
                            .map_err(|_| format!("Invalid --slides value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--timings=") {
                        opts.timings = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--start=") {
                        opts.start = Some(val.to_string());
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }
        Ok(Parsed::Run(opts))
    }
}

struct ConsoleRoute;

impl RoutePort for ConsoleRoute {
    fn replace(&self, path: &SlidePath) {
        info!(%path, "route replaced");
    }
}

struct ConsoleRenderer;

impl SlideRenderer for ConsoleRenderer {
    fn show(&self, slide: &Slide) {
        info!(id = %slide.id, title = ?slide.title, "show");
    }
    fn hide(&self, slide: &Slide) {
        info!(id = %slide.id, "hide");
    }
}

#[derive(Default)]
struct ConsoleViewport {
    fullscreen: Cell<bool>,
}

impl Viewport for ConsoleViewport {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }
    fn request_fullscreen(&self) -> Result<(), PlatformError> {
        self.fullscreen.set(true);
        info!("fullscreen on");
        Ok(())
    }
    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        self.fullscreen.set(false);
        info!("fullscreen off");
        Ok(())
    }
    fn scroll_to_top(&self) {
        info!("scroll to top");
    }
    fn scroll_thumbnail_into_view(&self, id: &str) {
        info!(id, "thumbnail into view");
    }
}

fn print_snapshot(snapshot: &NavigationSnapshot) {
    match serde_json::to_string(snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "snapshot not serializable"),
    }
}

fn run(opts: Opts) -> Result<(), Box<dyn Error>> {
    let presentation = match &opts.deck {
        Some(path) => Presentation::from_json(&fs::read_to_string(path)?)?,
        None => Presentation::numbered(opts.slides),
    };
    let timings = match &opts.timings {
        Some(path) => Timings::from_json(&fs::read_to_string(path)?)?,
        None => Timings::default(),
    };

    let mut pool = LocalPool::new();
    let ports = Ports {
        slides: Rc::new(presentation),
        route: Rc::new(ConsoleRoute),
        renderer: Rc::new(ConsoleRenderer),
        viewport: Rc::new(ConsoleViewport::default()),
        clock: Rc::new(SystemClock),
        spawner: Rc::new(pool.spawner()),
    };
    let controller = NavigationController::new(ports, timings, opts.start.as_deref())?;
    let _sub = controller.subscribe(print_snapshot);
    print_snapshot(&controller.snapshot());

    let (tx, mut lines) = mpsc::unbounded();
    thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.unbounded_send(line).is_err() {
                break;
            }
        }
    });

    pool.run_until(async {
        while let Some(line) = lines.next().await {
            let input = line.trim();
            match input {
                "" => {}
                "quit" | "exit" => break,
                "snapshot" => print_snapshot(&controller.snapshot()),
                path if path.starts_with('/') => {
                    let sync = controller.sync_from_route(path);
                    info!(path, ?sync, "route input");
                }
                key => {
                    if !controller.handle_key(&KeyEvent::new(key)) {
                        info!(key, "unbound key");
                    }
                }
            }
        }
    });
    controller.dispose();
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = match Opts::parse(env::args().skip(1), |name| env::var(name).ok()) {
        Ok(Parsed::Run(opts)) => opts,
        Ok(Parsed::Help) => {
            println!("{HELP_TEXT}");
            return;
        }
        Ok(Parsed::Version) => {
            println!("slide-nav {VERSION}");
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Run with --help for usage information.");
            process::exit(2);
        }
    };
    if let Err(e) = run(opts) {
        error!(error = %e, "slide-nav failed");
        process::exit(1);
    }
}
