//! Interactive TUI host for the wizard core.
//!
//! Drives the full render-pass protocol against a three-step wizard with an
//! in-memory routing fragment shown in the footer, so the deep-link and
//! back-button behavior is visible without a browser.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tracing_subscriber::EnvFilter;

use stepflow::{MemoryRouting, Reconciliation, RoutingHandle, Step, StepOptions, StepSlot, Wizard};

/// Demo step definitions: (label, route title, body).
const STEPS: &[(&str, &str, &str)] = &[
    (
        "Welcome",
        "FirstStep",
        "This is the first step. Press → or n to continue.",
    ),
    (
        "Details",
        "SecondStep",
        "A middle step. Going back keeps it marked as visited.",
    ),
    (
        "Confirm",
        "ThirdStep",
        "Last step. Press r to reset the wizard back to the start.",
    ),
];

#[derive(Parser)]
#[command(name = "stepflow-demo")]
#[command(about = "Interactive demo of the stepflow wizard core")]
#[command(version)]
struct Cli {
    /// Step shown before any navigation
    #[arg(long, default_value_t = 0)]
    initial_step: usize,

    /// Pre-set the routing fragment, as if the wizard URL was deep-linked
    #[arg(long)]
    fragment: Option<String>,
}

/// RAII guard that restores the terminal on drop, including early `?`
/// returns and panics unwinding through main.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = io::stdout().flush();
    }
}

/// Run render passes until the wizard state stops moving.
///
/// The first pass after mount can itself trigger a deep-link jump, which
/// invalidates the descriptors just handed out; a real component host would
/// simply re-render on the state change, so the demo loops the same way.
fn render_tree(
    wizard: &mut Wizard,
    slots: &mut [StepSlot],
) -> Result<(Vec<Step>, Reconciliation)> {
    loop {
        let version = wizard.version();

        wizard.begin_pass();
        let mut steps = Vec::with_capacity(STEPS.len());
        for (slot, (_, route_title, _)) in slots.iter_mut().zip(STEPS) {
            steps.push(slot.resolve(wizard, StepOptions::titled(*route_title))?);
        }
        let summary = wizard.finish_pass()?;

        if wizard.version() == version {
            return Ok((steps, summary));
        }
    }
}

fn draw(frame: &mut Frame, wizard: &Wizard, steps: &[Step], fragment: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Step rail: one cell per step with its activation state.
    let mut rail = Vec::new();
    for (step, (label, _, _)) in steps.iter().zip(STEPS) {
        let marker = if step.is_active {
            "●"
        } else if step.has_been_active {
            "◉"
        } else {
            "○"
        };
        let style = if step.is_active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if step.has_been_active {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        rail.push(Span::styled(format!(" {marker} {label} "), style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(rail))
            .block(Block::default().borders(Borders::ALL).title(" stepflow ")),
        chunks[0],
    );

    let body = steps
        .iter()
        .zip(STEPS)
        .find(|(step, _)| step.is_active)
        .map_or(
            "No active step: the active index points past the registered steps.",
            |(_, (_, _, body))| *body,
        );
    frame.render_widget(
        Paragraph::new(body).block(Block::default().borders(Borders::ALL).title(format!(
            " step {} of {} (max visited: {}) ",
            wizard.active_step_index() + 1,
            STEPS.len(),
            wizard.max_activated_step_index() + 1,
        ))),
        chunks[1],
    );

    let footer = vec![
        Line::from(format!("#/{}", fragment.unwrap_or(""))),
        Line::from("→/n next  ←/p prev  1-3 jump  r reset  e external hash edit  q quit"),
    ];
    frame.render_widget(
        Paragraph::new(footer).block(Block::default().borders(Borders::ALL).title(" routing ")),
        chunks[2],
    );
}

fn run(wizard: &mut Wizard, handle: &RoutingHandle) -> Result<()> {
    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut slots: Vec<StepSlot> = (0..STEPS.len()).map(|_| StepSlot::new()).collect();

    loop {
        let (steps, _summary) = render_tree(wizard, &mut slots)?;
        let fragment = handle.fragment();
        terminal.draw(|frame| draw(frame, &*wizard, &steps, fragment.as_deref()))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Right | KeyCode::Char('n') => wizard.next_step(),
                KeyCode::Left | KeyCode::Char('p') => wizard.previous_step(),
                KeyCode::Char('r') => wizard.reset_to_step(0),
                KeyCode::Char(c @ '1'..='9') => {
                    wizard.move_to_step(c as usize - '1' as usize);
                }
                KeyCode::Char('e') => {
                    // Simulate the user editing the URL hash by hand.
                    handle.set_fragment("ThirdStep");
                    wizard.handle_route_change();
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let routing = MemoryRouting::new();
    if let Some(fragment) = &cli.fragment {
        routing.handle().set_fragment(fragment.clone());
    }
    let handle = routing.handle();

    let mut wizard = Wizard::builder()
        .initial_step_index(cli.initial_step)
        .routing(routing)
        .on_change(|change| tracing::debug!(?change, "wizard change"))
        .build();

    run(&mut wizard, &handle)
}
