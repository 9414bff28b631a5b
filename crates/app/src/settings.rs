//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml`, overridden by `EXPENSE_BOT__*` environment
//! variables (e.g. `EXPENSE_BOT__TELEGRAM__TOKEN`).
//!
//! See `settings.example.toml` for the configuration.
use std::collections::BTreeMap;

use config::{Config, ConfigError, Environment, File};
use engine::{Amount, BudgetConfig, BudgetModel, Category, CategoryRegistry, EngineError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("expense_bot.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default)]
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Budget {
    pub timezone: String,
    pub weekday_budget: Amount,
    pub weekend_budget: Amount,
    /// Declaration order is kept for keyboards and summaries.
    pub categories: Vec<Category>,
    #[serde(default)]
    pub monthly_budgets: Vec<MonthlyBudget>,
}

/// A list rather than a table: config keys are case-normalised, category
/// names are not.
#[derive(Debug, Deserialize)]
pub struct MonthlyBudget {
    pub category: String,
    pub amount: Amount,
}

impl Budget {
    pub fn into_model(self) -> Result<BudgetModel, EngineError> {
        let registry = CategoryRegistry::new(self.categories)?;
        let budgets = BudgetConfig {
            weekday_budget: self.weekday_budget,
            weekend_budget: self.weekend_budget,
            monthly_budgets: self
                .monthly_budgets
                .into_iter()
                .map(|entry| (entry.category, entry.amount))
                .collect::<BTreeMap<_, _>>(),
        };
        BudgetModel::new(registry, budgets, &self.timezone)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    pub server: Option<Server>,
    pub telegram: Option<Telegram>,
    pub budget: Budget,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("EXPENSE_BOT")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("telegram.allowed_users")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;
    use engine::CategoryKind;

    use super::*;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    const FULL: &str = r#"
        database = "memory"

        [app]
        level = "debug"

        [server]
        port = 3000
        api_token = "s3cret"

        [telegram]
        token = "123:abc"
        allowed_users = [1001, 1002]

        [budget]
        timezone = "Asia/Singapore"
        weekday_budget = 50
        weekend_budget = "80.50"
        categories = [
            { name = "Meals", kind = "daily" },
            { name = "Groceries", kind = "monthly" },
            { name = "Gifts", kind = "other" },
        ]
        monthly_budgets = [{ category = "Groceries", amount = 300 }]
    "#;

    #[test]
    fn parses_full_settings() {
        let settings = parse(FULL).unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.database, Database::Memory);

        let server = settings.server.unwrap();
        assert_eq!(server.port, 3000);
        assert!(server.bind.is_none());
        assert_eq!(server.api_token.as_deref(), Some("s3cret"));

        assert_eq!(settings.telegram.unwrap().allowed_users, vec![1001, 1002]);

        let model = settings.budget.into_model().unwrap();
        assert_eq!(model.weekday_budget(), Amount::units(50));
        assert_eq!(model.weekend_budget(), Amount::new(8050));
        assert_eq!(model.monthly_budget_for("Groceries"), Some(Amount::units(300)));
        assert_eq!(
            model.registry().kind_of("Gifts").unwrap(),
            CategoryKind::Other
        );
    }

    #[test]
    fn optional_sections_default() {
        let settings = parse(
            r#"
            [budget]
            timezone = "UTC"
            weekday_budget = 10
            weekend_budget = 20
            categories = [{ name = "Meals", kind = "daily" }]
            "#,
        )
        .unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database, Database::Sqlite("expense_bot.db".to_string()));
        assert!(settings.server.is_none());
        assert!(settings.telegram.is_none());
        assert!(settings.budget.monthly_budgets.is_empty());
    }

    #[test]
    fn sqlite_path_is_read() {
        let settings = parse(&FULL.replace(
            r#"database = "memory""#,
            r#"database = { sqlite = "data/expenses.db" }"#,
        ))
        .unwrap();
        assert_eq!(settings.database, Database::Sqlite("data/expenses.db".to_string()));
    }

    #[test]
    fn invalid_budget_is_fatal() {
        let duplicated = FULL.replace(r#"{ name = "Gifts""#, r#"{ name = "Meals""#);
        assert!(matches!(
            parse(&duplicated).unwrap().budget.into_model(),
            Err(EngineError::InvalidConfig(_))
        ));

        let bad_zone = FULL.replace("Asia/Singapore", "Mars/Olympus");
        assert!(matches!(
            parse(&bad_zone).unwrap().budget.into_model(),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
