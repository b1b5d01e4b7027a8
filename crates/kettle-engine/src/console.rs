//! Interactive console driver.
//!
//! One session drives one kettle: ask for a water amount until it is
//! valid, describe the kettle, offer to switch it on, then heat inline
//! until the water boils or the user presses Ctrl+C. Ctrl+C is turned
//! into the kettle's OFF switch, so the loop stops through the same
//! cancellation path the web surface uses.

use std::sync::Arc;

use kettle_core::heating::HeatingReport;
use kettle_core::water::parse_water_amount;
use kettle_core::{HeatingLoop, Kettle, KettleModel, Notifier, Transition, messages};
use kettle_types::{Notification, Status};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{info, warn};

use crate::error::EngineError;
use crate::journal::Journal;

/// Answer that switches the kettle on.
const TURN_ON_ANSWER: &str = "on";

/// Line-oriented prompt over any async reader and writer.
pub struct Prompter<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wrap a reader and a writer.
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    /// Print `prompt` and read one line. Returns `None` at end of input.
    pub async fn ask(&mut self, prompt: &str) -> Result<Option<String>, EngineError> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await?)
    }
}

/// Run one console session.
pub async fn run<R, W>(
    prompter: &mut Prompter<R, W>,
    model: Arc<KettleModel>,
    journal: Arc<Journal>,
) -> Result<(), EngineError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    journal.announce(&Notification::Welcome);

    let prompt = messages::water_amount_prompt(&model.physics);
    let amount = loop {
        journal.flush().await;
        let Some(line) = prompter.ask(&prompt).await? else {
            journal.announce(&Notification::Goodbye);
            return Ok(());
        };
        match parse_water_amount(&line, &model.physics) {
            Ok(amount) => break amount,
            Err(e) => {
                warn!(input = %line, error = %e, "Rejected water amount");
                journal.announce(&Notification::WrongWaterAmount);
            }
        }
    };

    let notifier: Arc<dyn Notifier> = journal.clone();
    let kettle = Arc::new(Kettle::create(amount, model, notifier)?);
    journal.announce(&Notification::Created);
    journal.announce(&Notification::Described {
        text: kettle.describe(),
    });

    journal.flush().await;
    let answer = prompter.ask(messages::TURN_ON_PROMPT).await?;
    if answer.as_deref().map(str::trim) == Some(TURN_ON_ANSWER) {
        match kettle.switch().await {
            Transition::Heating(run) => {
                let report = heat_until_done(&kettle, run).await;
                info!(
                    kettle_id = %kettle.id(),
                    outcome = ?report.outcome,
                    steps = report.steps,
                    final_temperature = report.final_temperature,
                    "Console heating finished"
                );
            }
            Transition::Broken | Transition::SwitchedOff { .. } => {}
        }
    }

    journal.announce(&Notification::Goodbye);
    Ok(())
}

/// Drive a heating run inline, turning the kettle off on Ctrl+C.
async fn heat_until_done(kettle: &Arc<Kettle>, run: HeatingLoop) -> HeatingReport {
    let heating = run.run();
    tokio::pin!(heating);

    tokio::select! {
        report = &mut heating => report,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    info!(kettle_id = %kettle.id(), "Interrupt received, switching the kettle off");
                    let _off = kettle.request(Status::Off).await;
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
            }
            heating.await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kettle_core::config::PhysicsConfig;
    use kettle_db::{MessagePool, MessageStore};

    use super::*;
    use crate::journal::{Echo, Journal};

    fn fast_model() -> Arc<KettleModel> {
        Arc::new(KettleModel {
            specs: kettle_types::KettleSpecs::default(),
            physics: PhysicsConfig {
                tick_interval_ms: 0,
                ..PhysicsConfig::default()
            },
        })
    }

    async fn session(input: &'static str) -> (Vec<String>, String) {
        let pool = MessagePool::in_memory().await.unwrap();
        let (journal, writer) = Journal::spawn(Some(pool.clone()), Echo::Silent);
        let journal = Arc::new(journal);

        let mut out = Vec::new();
        {
            let mut prompter = Prompter::new(input.as_bytes(), &mut out);
            run(&mut prompter, fast_model(), Arc::clone(&journal))
                .await
                .unwrap();
        }
        drop(journal);
        writer.close().await;

        let rows = MessageStore::new(pool.pool()).recent(100).await.unwrap();
        let texts = rows.into_iter().rev().map(|r| r.message).collect();
        (texts, String::from_utf8(out).unwrap())
    }

    fn render(n: &Notification) -> String {
        messages::render(n)
    }

    #[tokio::test]
    async fn full_session_boils_the_water() {
        let (texts, prompts) = session("0.5\non\n").await;

        assert_eq!(texts.first(), Some(&render(&Notification::Welcome)));
        assert_eq!(texts.last(), Some(&render(&Notification::Goodbye)));
        assert!(texts.contains(&render(&Notification::Created)));
        assert!(texts.contains(&render(&Notification::TurnedOn)));
        assert_eq!(
            texts
                .iter()
                .filter(|t| t.starts_with("The kettle is heating now"))
                .count(),
            10
        );
        assert_eq!(
            texts
                .iter()
                .filter(|t| **t == render(&Notification::AutoOff))
                .count(),
            1
        );
        assert!(prompts.contains("Amount of water: "));
        assert!(prompts.contains("To turn on the kettle"));
    }

    #[tokio::test]
    async fn invalid_amounts_are_asked_again() {
        let (texts, prompts) = session("lots\n3\n0.2\nno\n").await;

        let wrong = render(&Notification::WrongWaterAmount);
        assert_eq!(texts.iter().filter(|t| **t == wrong).count(), 2);
        assert_eq!(prompts.matches("Amount of water: ").count(), 3);
        assert!(texts.contains(&render(&Notification::Created)));
        assert!(!texts.contains(&render(&Notification::TurnedOn)));
    }

    #[tokio::test]
    async fn empty_kettle_breaks_without_heating() {
        let (texts, _) = session("0\non\n").await;

        assert!(texts.contains(&render(&Notification::Broken)));
        assert!(
            !texts
                .iter()
                .any(|t| t.starts_with("The kettle is heating now"))
        );
        assert!(!texts.contains(&render(&Notification::AutoOff)));
    }

    #[tokio::test]
    async fn end_of_input_says_goodbye() {
        let (texts, _) = session("").await;
        assert_eq!(
            texts,
            vec![
                render(&Notification::Welcome),
                render(&Notification::Goodbye)
            ]
        );
    }
}
