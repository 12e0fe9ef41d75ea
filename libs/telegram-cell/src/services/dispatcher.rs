use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use appointment_cell::{
    Action, Command, ConversationId, ConversationState, ConversationStore, DialogueController,
    Menu, Trigger,
};

use crate::error::TelegramError;
use crate::models::{BotCommand, Update};
use crate::services::client::TelegramClient;
use crate::services::render::{ChatTarget, RenderTarget};

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_RETRY_PAUSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Command(Command),
    Callback {
        query_id: String,
        message_id: i64,
        data: String,
    },
}

/// One user action, stripped of transport details.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub conversation_id: ConversationId,
    pub user_id: i64,
    pub event: InboundEvent,
}

impl Inbound {
    /// `None` for updates the bot does not react to.
    pub fn from_update(update: &Update) -> Option<Self> {
        if let Some(query) = &update.callback_query {
            let Some(message) = &query.message else {
                debug!("Callback {} without a message, ignoring", query.id);
                return None;
            };
            return Some(Self {
                conversation_id: message.chat.id,
                user_id: query.from.id,
                event: InboundEvent::Callback {
                    query_id: query.id.clone(),
                    message_id: message.message_id,
                    data: query.data.clone().unwrap_or_default(),
                },
            });
        }

        let message = update.message.as_ref()?;
        let text = message.text.as_deref()?;
        let Some(command) = Command::parse(text) else {
            debug!("Ignoring non-command text in chat {}", message.chat.id);
            return None;
        };

        Some(Self {
            conversation_id: message.chat.id,
            user_id: message.from.as_ref().map_or(message.chat.id, |user| user.id),
            event: InboundEvent::Command(command),
        })
    }
}

pub struct BotDispatcher {
    controller: DialogueController,
    store: ConversationStore,
    client: Arc<TelegramClient>,
}

impl BotDispatcher {
    pub fn new(controller: DialogueController, client: Arc<TelegramClient>) -> Self {
        Self {
            controller,
            store: ConversationStore::new(),
            client,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub async fn register_commands(&self) -> Result<(), TelegramError> {
        let commands: Vec<BotCommand> = Command::ALL
            .into_iter()
            .map(|command| BotCommand {
                command: command.name().to_string(),
                description: command.description().to_string(),
            })
            .collect();

        self.client.set_my_commands(&commands).await
    }

    pub async fn handle_update(&self, update: Update) {
        let Some(inbound) = Inbound::from_update(&update) else {
            return;
        };

        let target = match &inbound.event {
            InboundEvent::Command(_) => ChatTarget::new(self.client.clone(), inbound.conversation_id),
            InboundEvent::Callback { query_id, message_id, .. } => ChatTarget::for_callback(
                self.client.clone(),
                inbound.conversation_id,
                *message_id,
                query_id.clone(),
            ),
        };

        if let Err(e) = self.process(&inbound, &target).await {
            error!("Failed to handle update {}: {}", update.update_id, e);
        }
    }

    /// Run one action against its conversation and render the outcome.
    ///
    /// The conversation slot stays locked until rendering finishes, so actions
    /// within one conversation never interleave. State is only written after the
    /// menu was delivered. A conversation back at the initial state gives up its
    /// slot.
    pub async fn process<R>(&self, inbound: &Inbound, target: &R) -> Result<(), TelegramError>
    where R: RenderTarget + ?Sized {
        let is_callback = matches!(inbound.event, InboundEvent::Callback { .. });
        let trigger = match &inbound.event {
            InboundEvent::Command(command) => Trigger::Command(*command),
            InboundEvent::Callback { data, .. } => match data.parse::<Action>() {
                Ok(action) => Trigger::Callback(action),
                Err(e) => {
                    warn!("Conversation {}: {}", inbound.conversation_id, e);
                    return target.alert(e.user_message()).await;
                }
            },
        };

        let slot = self.store.slot(inbound.conversation_id).await;
        let mut state = slot.lock().await;

        let transition = match self.controller.handle(&state, &trigger, inbound.user_id).await {
            Ok(transition) => transition,
            Err(e) if e.is_alert() => {
                warn!("Conversation {}: {}", inbound.conversation_id, e);
                return target.alert(e.user_message()).await;
            }
            Err(e) => {
                error!("Conversation {}: {}", inbound.conversation_id, e);
                target.send(&Menu::terminal(e.user_message())).await?;
                if is_callback {
                    target.acknowledge().await?;
                }
                return Ok(());
            }
        };

        if is_callback {
            // The button press is answered even when the edit failed.
            let edited = target.edit(&transition.menu).await;
            target.acknowledge().await?;
            edited?;
        } else {
            target.send(&transition.menu).await?;
        }

        if state.stage != transition.state.stage {
            info!(
                "Conversation {} moved {} -> {}",
                inbound.conversation_id, state.stage, transition.state.stage
            );
        }
        *state = transition.state;
        let finished = *state == ConversationState::default();
        drop(state);

        if finished {
            self.store.release(inbound.conversation_id, &slot).await;
        }
        Ok(())
    }

    /// Long-poll `getUpdates` forever, one task per update.
    pub async fn run_polling(self: Arc<Self>) {
        info!("Starting long polling");
        let mut offset: Option<i64> = None;

        loop {
            match self.client.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let dispatcher = self.clone();
                        tokio::spawn(async move {
                            dispatcher.handle_update(update).await;
                        });
                    }
                }
                Err(e) => {
                    error!("getUpdates failed: {}", e);
                    tokio::time::sleep(POLL_RETRY_PAUSE).await;
                }
            }
        }
    }
}
