//! Three-step dialogue for entering an expense.
//!
//! ```text
//! Idle --/add--> ChoosingCategory --category--> AwaitingAmount --amount--> Idle
//! ```
//!
//! [`transition`] is a pure function of the current state and the input, so a
//! redelivered message always computes the same transition. The state itself
//! lives in [`Storage`](crate::Storage); [`Engine::handle_message`] loads it,
//! applies the transition, writes the new state back and only then runs the
//! side effect.
//! There is no lock around that sequence: two messages of the same user
//! processed at once resolve as last-write-wins.

use serde::{Deserialize, Serialize};

use crate::{
    Amount, CategoryRegistry, DailySummary, Engine, MonthlySummary, ResultEngine,
    expenses::{Expense, UserId},
};

/// Number of buttons per row in the category keyboard.
pub const CATEGORY_ROW_LEN: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    ChoosingCategory,
    AwaitingAmount { category: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Add,
    Today,
    Month,
    Unknown(String),
}

impl Command {
    pub const KNOWN: [&'static str; 4] = ["/start", "/add", "/today", "/month"];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Text(String),
}

impl Input {
    /// Anything starting with `/` is a command; a `@botname` suffix and any
    /// arguments are ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.starts_with('/') {
            return Input::Text(trimmed.to_string());
        }

        let token = trimmed.split_whitespace().next().unwrap_or(trimmed);
        let name = token.split('@').next().unwrap_or(token);
        let command = match name {
            "/start" => Command::Start,
            "/add" => Command::Add,
            "/today" => Command::Today,
            "/month" => Command::Month,
            other => Command::Unknown(other.to_string()),
        };
        Input::Command(command)
    }
}

/// What the engine has to do once the next state is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Welcome,
    PromptCategory { retry: bool },
    PromptAmount { category: String },
    Record { category: String, amount: Amount },
    InvalidAmount { category: String },
    UsageHint,
    ShowToday,
    ShowMonth,
    UnknownCommand { command: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: ConversationState,
    pub effect: Effect,
}

impl Transition {
    fn new(next: ConversationState, effect: Effect) -> Self {
        Self { next, effect }
    }
}

pub fn transition(
    state: &ConversationState,
    input: &Input,
    registry: &CategoryRegistry,
) -> Transition {
    use ConversationState::*;

    match (state, input) {
        // Commands always abort whatever entry was in progress.
        (_, Input::Command(command)) => match command {
            Command::Add => Transition::new(ChoosingCategory, Effect::PromptCategory { retry: false }),
            Command::Start => Transition::new(Idle, Effect::Welcome),
            Command::Today => Transition::new(Idle, Effect::ShowToday),
            Command::Month => Transition::new(Idle, Effect::ShowMonth),
            Command::Unknown(name) => Transition::new(
                Idle,
                Effect::UnknownCommand {
                    command: name.clone(),
                },
            ),
        },
        (Idle, Input::Text(_)) => Transition::new(Idle, Effect::UsageHint),
        (ChoosingCategory, Input::Text(text)) => {
            if registry.contains(text) {
                Transition::new(
                    AwaitingAmount {
                        category: text.clone(),
                    },
                    Effect::PromptAmount {
                        category: text.clone(),
                    },
                )
            } else {
                Transition::new(ChoosingCategory, Effect::PromptCategory { retry: true })
            }
        }
        (AwaitingAmount { category }, Input::Text(text)) => match text.parse::<Amount>() {
            Ok(amount) => Transition::new(
                Idle,
                Effect::Record {
                    category: category.clone(),
                    amount,
                },
            ),
            Err(_) => Transition::new(
                state.clone(),
                Effect::InvalidAmount {
                    category: category.clone(),
                },
            ),
        },
    }
}

/// Result of one chat interaction, rendered by the chat adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    ChooseCategory { rows: Vec<Vec<String>>, retry: bool },
    EnterAmount { category: String },
    Recorded(Expense),
    InvalidAmount { category: String },
    UsageHint,
    Today(DailySummary),
    Month(MonthlySummary),
    UnknownCommand { command: String },
}

impl Engine {
    /// Handle one inbound chat message from `user_id`.
    ///
    /// The next state is written before the effect runs. A failed state write
    /// leaves the previously stored state in place and nothing else has been
    /// written; a failed insert after the reset drops the entry in progress.
    pub async fn handle_message(&self, user_id: UserId, text: &str) -> ResultEngine<Reply> {
        let input = Input::parse(text);
        let stored = self.storage.get_user_state(user_id).await?;
        let current = stored.clone().unwrap_or_default();
        let Transition { next, effect } = transition(&current, &input, self.model.registry());

        tracing::debug!("user {user_id}: {current:?} -> {next:?} ({effect:?})");

        self.persist_state(user_id, stored.as_ref(), &next).await?;
        self.run_effect(user_id, effect).await
    }

    async fn run_effect(&self, user_id: UserId, effect: Effect) -> ResultEngine<Reply> {
        let reply = match effect {
            Effect::Welcome => Reply::Welcome,
            Effect::PromptCategory { retry } => Reply::ChooseCategory {
                rows: self.model.registry().rows(CATEGORY_ROW_LEN),
                retry,
            },
            Effect::PromptAmount { category } => Reply::EnterAmount { category },
            Effect::Record { category, amount } => {
                Reply::Recorded(self.record_expense(user_id, &category, amount, None).await?)
            }
            Effect::InvalidAmount { category } => Reply::InvalidAmount { category },
            Effect::UsageHint => Reply::UsageHint,
            Effect::ShowToday => Reply::Today(self.daily_summary(None).await?),
            Effect::ShowMonth => Reply::Month(self.monthly_summary(None, None).await?),
            Effect::UnknownCommand { command } => Reply::UnknownCommand { command },
        };
        Ok(reply)
    }

    async fn persist_state(
        &self,
        user_id: UserId,
        stored: Option<&ConversationState>,
        next: &ConversationState,
    ) -> ResultEngine<()> {
        match (stored, next) {
            (None, ConversationState::Idle) => Ok(()),
            (Some(_), ConversationState::Idle) => self.storage.clear_user_state(user_id).await,
            (Some(stored), next) if stored == next => Ok(()),
            (_, next) => self.storage.set_user_state(user_id, next).await,
        }
    }
}
