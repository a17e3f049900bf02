//! Interactive converter session driven by line commands.
//!
//! Rates refresh on start, on a fixed interval while the session is
//! visible, and right away when it becomes visible again. Amount edits are
//! debounced; every other input recomputes immediately.

use super::ui;
use crate::core::config::AppConfig;
use crate::core::debounce::Debouncer;
use crate::core::rate_store::{RateEvent, RateStore};
use crate::core::session::{Input, Recompute, Session};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(Input),
    Hide,
    Show,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Input(Input::Submit);
    }

    let mut parts = line.split_whitespace();
    let keyword = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next();

    match (keyword.as_str(), argument) {
        ("quit" | "exit" | "q", None) => Command::Quit,
        ("help" | "?", None) => Command::Help,
        ("refresh", None) => Command::Refresh,
        ("hide", None) => Command::Hide,
        ("show", None) => Command::Show,
        ("swap", None) => Command::Input(Input::Swap),
        ("clear", None) => Command::Input(Input::Clear),
        ("from", Some(code)) => Command::Input(Input::From(code.to_string())),
        ("to", Some(code)) => Command::Input(Input::To(code.to_string())),
        _ if line.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            Command::Input(Input::Amount(line.to_string()))
        }
        _ => Command::Unknown(line.to_string()),
    }
}

fn print_help(session: &Session) {
    let currencies: Vec<&str> = session.currencies().iter().collect();
    println!(
        "{}",
        ui::style_text("Commands", ui::StyleType::Title)
    );
    println!("  <amount>      set the amount, e.g. 1,500.25");
    println!("  from <CODE>   set the source currency");
    println!("  to <CODE>     set the target currency");
    println!("  swap          swap currencies");
    println!("  clear         clear the amount");
    println!("  <enter>       convert now");
    println!("  hide / show   pause or resume scheduled refreshes");
    println!("  refresh       fetch rates now");
    println!("  quit          exit");
    println!(
        "{}",
        ui::style_text(
            &format!("Currencies: {}", currencies.join(", ")),
            ui::StyleType::Subtle
        )
    );
}

fn spawn_refresh(store: &Arc<RateStore>) {
    let store = Arc::clone(store);
    tokio::spawn(async move {
        store.refresh().await;
    });
}

fn render(session: &mut Session) {
    let view = session.render();
    if view.needs_rates() {
        spawn_refresh(session.store());
    }
    ui::print_view(&view);
    if view.clear_visible {
        println!(
            "{}",
            ui::style_text("(type `clear` to reset the amount)", ui::StyleType::Subtle)
        );
    }
}

pub async fn run<R>(config: &AppConfig, mut session: Session, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let store = Arc::clone(session.store());
    let mut events = store.subscribe();
    let mut lines = input.lines();
    let mut debouncer = Debouncer::new(config.debounce());
    let period = config.refresh_interval();
    let mut refresh_timer = interval_at(Instant::now() + period, period);
    refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut visible = true;
    let mut spinner: Option<ProgressBar> = None;

    print_help(&session);
    spawn_refresh(&store);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("Input closed");
                    break;
                };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Help => print_help(&session),
                    Command::Refresh => spawn_refresh(&store),
                    Command::Hide => {
                        visible = false;
                        info!("Session hidden, scheduled refreshes paused");
                    }
                    Command::Show => {
                        if !visible {
                            info!("Session visible again, refreshing rates");
                            spawn_refresh(&store);
                        }
                        visible = true;
                    }
                    Command::Input(input) => match session.apply(input) {
                        Ok(Recompute::Debounced) => debouncer.schedule(),
                        Ok(Recompute::Immediate) => {
                            debouncer.cancel();
                            render(&mut session);
                        }
                        Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                    },
                    Command::Unknown(text) => println!(
                        "{}",
                        ui::style_text(&format!("Unknown command: {text} (try `help`)"), ui::StyleType::Error)
                    ),
                }
            }
            _ = debouncer.fired() => render(&mut session),
            _ = refresh_timer.tick() => {
                if visible {
                    spawn_refresh(&store);
                } else {
                    debug!("Session hidden, skipping scheduled refresh");
                }
            }
            event = events.recv() => match event {
                Ok(RateEvent::Loading) => {
                    spinner.get_or_insert_with(|| ui::new_spinner("Fetching exchange rates..."));
                }
                Ok(RateEvent::Updated { .. } | RateEvent::Failed(_)) => {
                    if let Some(spinner) = spinner.take() {
                        spinner.finish_and_clear();
                    }
                    render(&mut session);
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Missed rate events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Some(spinner) = spinner.take() {
        spinner.finish_and_clear();
    }
    Ok(())
}
