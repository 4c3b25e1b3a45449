//! Hands decided side effects to the asynchronous collaborators.
//!
//! Every await is raced against the engine's cancellation token. Message
//! failures are logged and dropped; persistence and award failures fail the
//! round that produced them.

use std::collections::BTreeSet;
use std::future::Future;

use combat_core::{EntityId, Message, Outbox};
use tracing::warn;

use super::CombatEngine;
use crate::api::{CombatError, DeathReport, Result};

impl CombatEngine {
    /// Awaits `fut` unless the engine is cancelled first.
    async fn guarded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        if self.cancel.is_cancelled() {
            return Err(CombatError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CombatError::Cancelled),
            result = fut => result,
        }
    }

    /// Sends every queued message in order.
    pub(crate) async fn deliver(&self, outbox: &mut Outbox) -> Result<()> {
        for message in outbox.drain() {
            let messenger = self.messenger.as_ref();
            let sent = match &message {
                Message::ToPlayer { to, text } => {
                    self.guarded(messenger.send_line(*to, text)).await
                }
                Message::ToRoom {
                    room,
                    exclude,
                    text,
                } => self.guarded(messenger.send_room(*room, exclude, text)).await,
                Message::Sound { to, cue } => self.guarded(messenger.send_sound(*to, *cue)).await,
            };
            match sent {
                Ok(()) => {}
                Err(CombatError::Cancelled) => return Err(CombatError::Cancelled),
                Err(error) => {
                    warn!(
                        target: "combat::delivery",
                        ?message,
                        %error,
                        "message delivery failed"
                    );
                }
            }
        }
        Ok(())
    }

    /// Grants the kill award and saves every player the death touched.
    pub(crate) async fn settle(&self, death: &DeathReport) -> Result<()> {
        if let Some(award) = death.award {
            self.guarded(self.awards.grant(death.killer, award))
                .await
                .inspect_err(|error| {
                    warn!(
                        target: "combat::delivery",
                        player = %death.killer,
                        %error,
                        "award grant failed"
                    );
                })?;
        }

        let touched: BTreeSet<EntityId> = [death.killer, death.victim]
            .into_iter()
            .chain(death.experience.iter().map(|gain| gain.recipient))
            .chain(death.retargeted.iter().map(|(attacker, _)| *attacker))
            .collect();

        for id in touched {
            let Some(combatant) = self.population.get(id) else {
                continue;
            };
            if !combatant.is_player() {
                continue;
            }
            self.guarded(self.persistence.save(combatant))
                .await
                .inspect_err(|error| {
                    warn!(
                        target: "combat::delivery",
                        player = %id,
                        %error,
                        "save failed"
                    );
                })?;
        }
        Ok(())
    }
}
