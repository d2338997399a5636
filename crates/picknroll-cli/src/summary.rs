use console::Style;
use picknroll_core::history::HistoryStatus;
use picknroll_core::{Displayed, FileHandle, ImageHost, Session, ShowOutcome};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    shown: Style,
    disabled: Style,
    failed: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            shown: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            failed: Style::new().red(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_roll_header<F: FileHandle, H: ImageHost>(session: &Session<F, H>, candidates: usize) {
    let s = Styles::new();
    let config = session.config();
    let viewport = session.viewport();

    println!();
    println!("  {}", s.title.apply_to("Pick'n'Roll"));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}")
    );
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Candidates"),
        s.value.apply_to(candidates)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Viewport"),
        s.value.apply_to(format!("{}x{}", viewport.width, viewport.height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Cache"),
        s.value.apply_to(config.cache_capacity)
    );
    match config.seed {
        Some(seed) => println!("  {:<14}{}", s.label.apply_to("Seed"), s.value.apply_to(seed)),
        None => println!("  {:<14}{}", s.label.apply_to("Seed"), s.disabled.apply_to("random")),
    }
    println!();
}

pub fn print_outcome<F: FileHandle, H: ImageHost>(session: &Session<F, H>, roll: usize, outcome: ShowOutcome) {
    let s = Styles::new();
    let label = format!("Roll {roll}");

    match (outcome, session.displayed()) {
        (ShowOutcome::Shown(id), Displayed::Image(image)) if image.id == id => {
            let transform = session.transform();
            println!(
                "  {:<14}{}  {}  {}",
                s.label.apply_to(label),
                s.shown.apply_to(id),
                s.path.apply_to(&image.path),
                s.value.apply_to(format!(
                    "{} @ {:.1}%",
                    image.dimensions, transform.scale_percent
                ))
            );
        }
        (ShowOutcome::Failed(id), Displayed::Failed { reason, .. }) => {
            println!(
                "  {:<14}{}  {}",
                s.label.apply_to(label),
                s.failed.apply_to(id),
                s.failed.apply_to(format!("failed to load: {reason}"))
            );
        }
        (ShowOutcome::Superseded(id), _) => {
            println!(
                "  {:<14}{}  {}",
                s.label.apply_to(label),
                s.disabled.apply_to(id),
                s.disabled.apply_to("superseded")
            );
        }
        (outcome, _) => {
            println!(
                "  {:<14}{}  {}",
                s.label.apply_to(label),
                s.disabled.apply_to(outcome.id()),
                s.disabled.apply_to("unavailable")
            );
        }
    }
}

pub fn print_history<F: FileHandle, H: ImageHost>(session: &Session<F, H>) {
    let s = Styles::new();
    let history = session.history();
    let cursor = session.history_cursor();

    println!();
    println!("  {}", s.header.apply_to(format!("History ({})", history.len())));
    for (i, entry) in history.iter().enumerate() {
        let marker = if i == cursor { ">" } else { " " };
        let status = match entry.status {
            HistoryStatus::Loaded => s.shown.apply_to("loaded"),
            HistoryStatus::Pending => s.disabled.apply_to("pending"),
            HistoryStatus::Failed => s.failed.apply_to("failed"),
            HistoryStatus::Evicted => s.disabled.apply_to("evicted"),
        };
        println!(
            "  {} {:>3}. {:<8} {}  {}",
            marker,
            s.label.apply_to(i),
            status,
            s.value.apply_to(entry.id),
            s.path.apply_to(&entry.path)
        );
    }
    println!();
}
