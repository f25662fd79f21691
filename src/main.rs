use std::error::Error;
use std::io::{self, Write};
use std::{env, process};

use log::{info, LevelFilter};
use sortvis::config::{validate_size, validate_speed, MAX_VALUE};
use sortvis::{Controller, Element, Event, Highlight, Outcome, Pacing, Settings, Snapshot};

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn colour(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::Unsorted => "\x1b[90m",
        Highlight::Comparing => "\x1b[33m",
        Highlight::Swapping => "\x1b[31m",
        Highlight::Pivot => "\x1b[35m",
        Highlight::Sorted => "\x1b[32m",
    }
}

fn bar(el: &Element) -> char {
    let level = (el.value as usize * LEVELS.len()) / (MAX_VALUE as usize + 1);
    LEVELS[level.min(LEVELS.len() - 1)]
}

fn render(snapshot: &Snapshot) -> String {
    let mut res = String::new();
    for el in snapshot.elements.iter() {
        res.push_str(colour(el.highlight()));
        res.push(bar(el));
    }
    res.push_str("\x1b[0m");
    res.push_str(&format!(
        "  comparisons: {:>5}  swaps: {:>5}",
        snapshot.counters.comparisons, snapshot.counters.swaps
    ));
    res
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut settings = Settings::from_env()?;

    // sortvis [algorithm] [size] [speed]
    let mut args = env::args();
    args.next();
    if let Some(arg) = args.next() {
        settings.algorithm = arg.parse()?;
    }
    if let Some(arg) = args.next() {
        settings.size = match arg.parse::<usize>() {
            Ok(size) => validate_size(size)?,
            Err(_) => {
                eprintln!("Usage: sortvis [bubble|selection|insertion|merge|quick] [size] [speed]");
                process::exit(1);
            }
        };
    }
    if let Some(arg) = args.next() {
        settings.speed = match arg.parse::<u8>() {
            Ok(speed) => validate_speed(speed)?,
            Err(_) => {
                eprintln!("Usage: sortvis [bubble|selection|insertion|merge|quick] [size] [speed]");
                process::exit(1);
            }
        };
    }

    let pacing = settings.pacing;
    let (mut controller, events) = Controller::new(settings)?;
    controller.start()?;

    let mut stdout = io::stdout();
    let mut last: Option<Snapshot> = None;
    for event in events.iter() {
        match event {
            Event::Snapshot(snapshot) => {
                if pacing == Pacing::Realtime {
                    write!(stdout, "\r{}", render(&snapshot))?;
                    stdout.flush()?;
                }
                last = Some(snapshot);
            }
            Event::State(state) => info!("State: {:?}", state),
            Event::Finished(_) => break,
        }
    }

    if let Some(snapshot) = last {
        writeln!(stdout, "\r{}", render(&snapshot))?;
    }

    if let Some(report) = controller.wait() {
        let legend: Vec<String> = Highlight::LEGEND
            .iter()
            .map(|h| format!("{}{}\x1b[0m", colour(*h), h))
            .collect();
        println!("{}", legend.join(" "));
        println!(
            "{}: {:?}, {} comparisons, {} swaps in {:?}",
            report.algorithm, report.outcome, report.counters.comparisons, report.counters.swaps, report.elapsed
        );
        if let Outcome::Faulted(message) = report.outcome {
            return Err(message.into());
        }
    }

    Ok(())
}
