//! Persisted conversation state, one row per user.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::conversation::ConversationState;

pub(crate) const STEP_IDLE: &str = "idle";
pub(crate) const STEP_CHOOSING_CATEGORY: &str = "choosing_category";
pub(crate) const STEP_AWAITING_AMOUNT: &str = "awaiting_amount";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub step: String,
    pub pending_category: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_state(user_id: i64, state: &ConversationState) -> Self {
        let (step, pending_category) = match state {
            ConversationState::Idle => (STEP_IDLE, None),
            ConversationState::ChoosingCategory => (STEP_CHOOSING_CATEGORY, None),
            ConversationState::AwaitingAmount { category } => {
                (STEP_AWAITING_AMOUNT, Some(category.clone()))
            }
        };
        Self {
            user_id: ActiveValue::Set(user_id),
            step: ActiveValue::Set(step.to_string()),
            pending_category: ActiveValue::Set(pending_category),
        }
    }
}

impl From<Model> for ConversationState {
    /// Rows that break the step/category pairing fall back to `Idle`.
    fn from(model: Model) -> Self {
        match (model.step.as_str(), model.pending_category) {
            (STEP_CHOOSING_CATEGORY, None) => ConversationState::ChoosingCategory,
            (STEP_AWAITING_AMOUNT, Some(category)) => ConversationState::AwaitingAmount { category },
            (STEP_IDLE, None) => ConversationState::Idle,
            (step, _) => {
                tracing::warn!(
                    "inconsistent state row for user {}: step \"{step}\", resetting",
                    model.user_id
                );
                ConversationState::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(step: &str, category: Option<&str>) -> Model {
        Model {
            user_id: 1,
            step: step.to_string(),
            pending_category: category.map(ToString::to_string),
        }
    }

    #[test]
    fn rows_map_to_states() {
        assert_eq!(
            ConversationState::from(model(STEP_AWAITING_AMOUNT, Some("Meals"))),
            ConversationState::AwaitingAmount {
                category: "Meals".to_string()
            }
        );
        assert_eq!(
            ConversationState::from(model(STEP_CHOOSING_CATEGORY, None)),
            ConversationState::ChoosingCategory
        );
    }

    #[test]
    fn inconsistent_rows_reset_to_idle() {
        assert_eq!(
            ConversationState::from(model(STEP_AWAITING_AMOUNT, None)),
            ConversationState::Idle
        );
        assert_eq!(
            ConversationState::from(model(STEP_IDLE, Some("Meals"))),
            ConversationState::Idle
        );
        assert_eq!(
            ConversationState::from(model("bogus", None)),
            ConversationState::Idle
        );
    }
}
