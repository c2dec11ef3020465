// SPDX-License-Identifier: MPL-2.0
//! Command-line demo: queues croutons on the in-memory host and prints what
//! the host is asked to do, with timestamps.

use crouton::config;
use crouton::crouton::{Configuration, Crouton, Phase, Style};
use crouton::diagnostics::DiagnosticsCollector;
use crouton::error::{Error, Result};
use crouton::host::memory::{HostOp, MemoryHost, MemoryWindow};
use crouton::host::{Container, Insertion, LayoutParams};
use crouton::manager::Manager;
use crouton::scheduler::{Scheduler, TokioScheduler, VirtualScheduler};
use log::{info, warn, LevelFilter};
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

const HELP: &str = "\
crouton-demo: show a queue of croutons on an in-memory host

USAGE:
  crouton-demo [OPTIONS]

OPTIONS:
  --style NAME        alert, confirm, info, infinite or custom [default: info]
  --text TEXT         crouton text [default: Hello]
  --duration MS       display duration in milliseconds
  --count N           number of croutons to queue [default: 3]
  --container         show inside a linear container instead of the window root
  --realtime          run on tokio timers instead of virtual time
  --config-dir DIR    read crouton.toml from DIR
  -v, --verbose       log every transition
  -h, --help          print this help
";

/// How long an infinite crouton is left on screen before the demo removes it.
const INFINITE_HOLD: Duration = Duration::from_secs(2);

/// Upper bound of a virtual-time run.
const VIRTUAL_LIMIT: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoStyle {
    Alert,
    Confirm,
    Info,
    Infinite,
    Custom,
}

impl FromStr for DemoStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alert" => Ok(Self::Alert),
            "confirm" => Ok(Self::Confirm),
            "info" => Ok(Self::Info),
            "infinite" => Ok(Self::Infinite),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown style: {other}")),
        }
    }
}

#[derive(Debug)]
struct Args {
    style: DemoStyle,
    text: String,
    duration: Option<u64>,
    count: usize,
    container: bool,
    realtime: bool,
    config_dir: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(None);
    }

    let parsed = Args {
        style: args
            .opt_value_from_str("--style")?
            .unwrap_or(DemoStyle::Info),
        text: args
            .opt_value_from_str("--text")?
            .unwrap_or_else(|| "Hello".to_string()),
        duration: args.opt_value_from_str("--duration")?,
        count: args.opt_value_from_str("--count")?.unwrap_or(3),
        container: args.contains("--container"),
        realtime: args.contains("--realtime"),
        config_dir: args.opt_value_from_str("--config-dir")?,
        verbose: args.contains(["-v", "--verbose"]),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        eprintln!("ignoring unexpected arguments: {remaining:?}");
    }
    Ok(Some(parsed))
}

fn main() -> Result<()> {
    let Some(args) = parse_args().map_err(|err| Error::Config(err.to_string()))? else {
        return Ok(());
    };

    let level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|err| Error::Config(err.to_string()))?;

    let (settings, warning) = config::load_with_override(args.config_dir.clone());
    if let Some(warning) = warning {
        warn!("{warning}, using defaults");
    }

    let host = MemoryHost::new();
    let window = host.window();
    let container = if args.container {
        // A linear container that already holds some content.
        let container: Rc<dyn Container> = host.container(false);
        container.add_view(host.view(120), Insertion::Append, LayoutParams::default());
        Some(container)
    } else {
        None
    };
    host.take_journal();

    let croutons: Vec<Crouton> = (0..args.count)
        .map(|index| build_crouton(&args, &settings, &host, &window, container.clone(), index))
        .collect();

    let mut collector = settings
        .diagnostics
        .enabled
        .then(|| DiagnosticsCollector::new(settings.diagnostics.capacity()));

    if args.realtime {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        runtime.block_on(async {
            let (scheduler, mut event_rx) = TokioScheduler::new();
            let mut manager = Manager::with_settings(scheduler, &settings);
            if let Some(collector) = &collector {
                manager.set_diagnostics(collector.handle());
            }
            for crouton in croutons {
                manager.enqueue(crouton);
            }
            print_journal(manager.scheduler().now(), &host);

            while !manager.is_idle() {
                match tokio::time::timeout(INFINITE_HOLD, event_rx.recv()).await {
                    Ok(Some(event)) => manager.on_event(event),
                    Ok(None) => break,
                    Err(_) => {
                        if !remove_infinite_head(&mut manager) {
                            continue;
                        }
                    }
                }
                print_journal(manager.scheduler().now(), &host);
            }
        });
    } else {
        let mut manager = Manager::with_settings(VirtualScheduler::new(), &settings);
        if let Some(collector) = &collector {
            manager.set_diagnostics(collector.handle());
        }
        for crouton in croutons {
            manager.enqueue(crouton);
        }
        run_virtual(&mut manager, &host);
    }

    if let Some(collector) = collector.as_mut() {
        collector.process_pending();
        println!("{}", collector.export_json()?);
    }
    info!("all croutons shown");
    Ok(())
}

fn build_crouton(
    args: &Args,
    settings: &config::Settings,
    host: &MemoryHost,
    window: &Rc<MemoryWindow>,
    container: Option<Rc<dyn Container>>,
    index: usize,
) -> Crouton {
    let text = if args.count > 1 {
        format!("{} #{}", args.text, index + 1)
    } else {
        args.text.clone()
    };

    let mut crouton = match (args.style, container) {
        (DemoStyle::Custom, Some(container)) => {
            Crouton::make_in(window.clone(), host.view(64), container)
        }
        (DemoStyle::Custom, None) => Crouton::make(window.clone(), host.view(64)),
        (style, Some(container)) => {
            Crouton::make_text_in(window.clone(), text, style_for(style), container)
        }
        (style, None) => Crouton::make_text(window.clone(), text, style_for(style)),
    };

    let configuration = match (args.style, args.duration) {
        (DemoStyle::Infinite, _) => Configuration::infinite(),
        (_, Some(millis)) => Configuration::builder().duration_millis(millis).build(),
        (_, None) => settings.default_configuration(),
    };
    crouton = crouton.with_configuration(configuration);

    let id = crouton.id();
    crouton.with_on_click(move || info!("{id} clicked"))
}

fn style_for(style: DemoStyle) -> Style {
    match style {
        DemoStyle::Alert => Style::alert(),
        DemoStyle::Confirm => Style::confirm(),
        DemoStyle::Info | DemoStyle::Infinite | DemoStyle::Custom => Style::info(),
    }
}

/// Steps the virtual clock from one due event to the next, printing the
/// host operations of each step.
fn run_virtual(manager: &mut Manager<VirtualScheduler>, host: &MemoryHost) {
    loop {
        print_journal(manager.scheduler().now(), host);
        match manager.scheduler().next_due() {
            Some(due) if due <= VIRTUAL_LIMIT => manager.run_until(due),
            _ => {
                let hold_until = manager.scheduler().now() + INFINITE_HOLD;
                manager.run_until(hold_until);
                if !remove_infinite_head(manager) {
                    break;
                }
            }
        }
    }
}

/// Removes the head if it is an infinite crouton fully on screen.
fn remove_infinite_head<S: Scheduler>(manager: &mut Manager<S>) -> bool {
    let infinite_head = manager.head().and_then(|head| {
        let waiting = head.phase() == Phase::Visible
            && head.configuration().duration().is_infinite();
        waiting.then(|| head.id())
    });
    match infinite_head {
        Some(id) => {
            info!("removing {id}");
            manager.remove(id);
            true
        }
        None => false,
    }
}

fn print_journal(now: Duration, host: &MemoryHost) {
    for op in host.take_journal() {
        println!("[{:>7} ms] {}", now.as_millis(), describe(&op));
    }
}

fn describe(op: &HostOp) -> String {
    match op {
        HostOp::Attached {
            view,
            container,
            insertion,
            params,
        } => format!(
            "attach view {} to container {} ({insertion:?}, top margin {})",
            view.0, container.0, params.top_margin
        ),
        HostOp::Detached { view, container } => {
            format!("detach view {} from container {}", view.0, container.0)
        }
        HostOp::LayoutRequested(view) => format!("layout view {}", view.0),
        HostOp::Animated { view, animation } => format!("animate view {} {animation:?}", view.0),
        HostOp::Announced(text) => format!("announce \"{text}\""),
    }
}
