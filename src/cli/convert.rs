use super::ui;
use crate::core::rate_store::RefreshOutcome;
use crate::core::session::{Conversion, Input, Session};
use anyhow::{Context, Result, anyhow};
use tracing::debug;

/// One-shot conversion. Arguments that are not given fall back to the
/// stored preferences; the ones that are given become the new preferences.
pub async fn run(
    mut session: Session,
    amount: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    if let Some(amount) = amount {
        session.apply(Input::Amount(amount))?;
    }
    if let Some(from) = from {
        session.apply(Input::From(from))?;
    }
    if let Some(to) = to {
        session.apply(Input::To(to))?;
    }
    debug!(
        from = session.from(),
        to = session.to(),
        amount = session.raw_amount(),
        "Converting"
    );

    let spinner = ui::new_spinner("Fetching exchange rates...");
    let outcome = session.store().refresh().await;
    spinner.finish_and_clear();

    if let RefreshOutcome::Failed(e) = outcome {
        return Err(anyhow::Error::new(e)).context("Could not load exchange rates");
    }

    let view = session.render();
    match &view.conversion {
        Conversion::Value { .. } => {
            ui::print_view(&view);
            Ok(())
        }
        Conversion::Error(e) => Err(anyhow::Error::new(e.clone())),
        Conversion::AwaitingRates => Err(anyhow!("No exchange rates available")),
    }
}
