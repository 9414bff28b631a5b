use chrono::NaiveDate;
use engine::{
    Amount, BudgetModel, CategoryTotal, Command, DailySummary, DayKind, MonthlySummary, Reply,
};
use teloxide::{
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup},
    utils::command::BotCommands,
};

use crate::commands::BotCommand;

pub(crate) fn failure_text() -> &'static str {
    "Something went wrong, please try again."
}

pub(crate) fn remove_keyboard() -> ReplyMarkup {
    ReplyMarkup::KeyboardRemove(KeyboardRemove::new())
}

/// Category picker, one button per category in declaration order.
pub(crate) fn category_keyboard(rows: &[Vec<String>]) -> ReplyMarkup {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(rows)
            .resize_keyboard()
            .one_time_keyboard(),
    )
}

pub(crate) fn render_reply(reply: &Reply, model: &BudgetModel) -> (String, ReplyMarkup) {
    match reply {
        Reply::ChooseCategory { rows, retry } => {
            let text = if *retry {
                "Please pick one of the categories below."
            } else {
                "Choose a category:"
            };
            (text.to_string(), category_keyboard(rows))
        }
        other => (render_text(other, model), remove_keyboard()),
    }
}

fn render_text(reply: &Reply, model: &BudgetModel) -> String {
    match reply {
        Reply::Welcome => welcome_text(),
        Reply::ChooseCategory { .. } => "Choose a category:".to_string(),
        Reply::EnterAmount { category } => format!("Enter the amount for {category}:"),
        Reply::Recorded(expense) => format!(
            "Recorded {} for {} on {}.",
            expense.amount, expense.category, expense.local_date
        ),
        Reply::InvalidAmount { category } => {
            format!(
                "Please enter a valid number for {category} with at most two decimals, e.g. 12.50"
            )
        }
        Reply::UsageHint => {
            "Send /add to record an expense, /today or /month to see your budget.".to_string()
        }
        Reply::Today(summary) => render_daily(summary),
        Reply::Month(summary) => render_monthly(summary, model),
        Reply::UnknownCommand { command } => format!(
            "Unknown command {command}. Available commands: {}",
            Command::KNOWN.join(", ")
        ),
    }
}

fn welcome_text() -> String {
    format!(
        "Welcome! I keep track of your daily and monthly budget.\n\n{}",
        BotCommand::descriptions()
    )
}

pub(crate) fn render_daily(summary: &DailySummary) -> String {
    let kind = match summary.day_kind {
        DayKind::Weekday => "weekday",
        DayKind::Weekend => "weekend",
    };
    format!(
        "{} ({kind})\nBudget: {}\nSpent: {}\nRemaining: {}",
        summary.date, summary.budget, summary.spent, summary.remaining
    )
}

pub(crate) fn render_monthly(summary: &MonthlySummary, model: &BudgetModel) -> String {
    let title = NaiveDate::from_ymd_opt(summary.year, summary.month, 1)
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", summary.year, summary.month));

    let mut lines = vec![
        format!(
            "{title} ({} weekdays, {} weekend days)",
            summary.weekday_count, summary.weekend_count
        ),
        format!(
            "Daily: {} of {}",
            summary.spent_daily, summary.monthly_daily_budget
        ),
    ];

    lines.extend(summary.per_category_monthly.iter().map(|row| {
        let budget = model.monthly_budget_for(&row.category).unwrap_or(Amount::ZERO);
        format!("{}: {} of {}", row.category, row.total, budget)
    }));

    if !summary.per_category_other.is_empty() {
        lines.push(format!("Other (not budgeted): {}", summary.spent_other));
        lines.extend(summary.per_category_other.iter().map(other_line));
    }

    lines.push(format!(
        "Total: {} of {}",
        summary.total_spent_tracked, summary.total_budget_tracked
    ));
    lines.push(format!("Remaining: {}", summary.remaining_tracked));
    lines.join("\n")
}

fn other_line(row: &CategoryTotal) -> String {
    format!("  {}: {}", row.category, row.total)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use engine::{BudgetConfig, Category, CategoryKind, CategoryRegistry, Expense};

    use super::*;

    fn model() -> BudgetModel {
        let registry = CategoryRegistry::new(vec![
            Category::new("Meals", CategoryKind::Daily),
            Category::new("Groceries", CategoryKind::Monthly),
            Category::new("Gym", CategoryKind::Monthly),
            Category::new("Gifts", CategoryKind::Other),
        ])
        .unwrap();
        let budgets = BudgetConfig {
            weekday_budget: Amount::units(50),
            weekend_budget: Amount::units(80),
            monthly_budgets: BTreeMap::from([
                ("Groceries".to_string(), Amount::units(300)),
                ("Gym".to_string(), Amount::units(40)),
            ]),
        };
        BudgetModel::new(registry, budgets, "Asia/Singapore").unwrap()
    }

    fn total(category: &str, cents: i64) -> CategoryTotal {
        CategoryTotal {
            category: category.to_string(),
            total: Amount::new(cents),
        }
    }

    #[test]
    fn daily_summary_uses_two_decimals() {
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            day_kind: DayKind::Weekend,
            budget: Amount::units(80),
            spent: Amount::new(9050),
            remaining: Amount::new(-1050),
        };
        assert_eq!(
            render_daily(&summary),
            "2025-03-15 (weekend)\nBudget: 80.00\nSpent: 90.50\nRemaining: -10.50"
        );
    }

    #[test]
    fn monthly_summary_lists_active_categories() {
        let summary = MonthlySummary {
            year: 2025,
            month: 3,
            weekday_count: 21,
            weekend_count: 10,
            monthly_daily_budget: Amount::units(1850),
            spent_daily: Amount::units(200),
            spent_monthly: Amount::units(120),
            per_category_monthly: vec![total("Groceries", 12000)],
            spent_other: Amount::units(30),
            per_category_other: vec![total("Gifts", 3000)],
            fixed_budget_total: Amount::units(340),
            total_budget_tracked: Amount::units(2190),
            total_spent_tracked: Amount::units(320),
            remaining_tracked: Amount::units(1870),
        };

        let text = render_monthly(&summary, &model());
        assert_eq!(
            text,
            "March 2025 (21 weekdays, 10 weekend days)\n\
             Daily: 200.00 of 1850.00\n\
             Groceries: 120.00 of 300.00\n\
             Other (not budgeted): 30.00\n  Gifts: 30.00\n\
             Total: 320.00 of 2190.00\n\
             Remaining: 1870.00"
        );
        assert!(!text.contains("Gym"));
    }

    #[test]
    fn category_choice_comes_with_a_keyboard() {
        let reply = Reply::ChooseCategory {
            rows: vec![vec!["Meals".to_string(), "Groceries".to_string()]],
            retry: true,
        };
        let (text, markup) = render_reply(&reply, &model());
        assert_eq!(text, "Please pick one of the categories below.");
        let ReplyMarkup::Keyboard(keyboard) = markup else {
            panic!("expected a reply keyboard");
        };
        assert_eq!(keyboard.keyboard.len(), 1);
        assert_eq!(keyboard.keyboard[0][1].text, "Groceries");
    }

    #[test]
    fn other_replies_remove_the_keyboard() {
        let expense = Expense::new(
            1,
            "Meals".to_string(),
            Amount::new(1250),
            Utc.with_ymd_and_hms(2025, 3, 17, 2, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
        );
        let (text, markup) = render_reply(&Reply::Recorded(expense), &model());
        assert_eq!(text, "Recorded 12.50 for Meals on 2025-03-17.");
        assert!(matches!(markup, ReplyMarkup::KeyboardRemove(_)));
    }

    #[test]
    fn unknown_command_lists_valid_ones() {
        let reply = Reply::UnknownCommand {
            command: "/foo".to_string(),
        };
        let (text, _) = render_reply(&reply, &model());
        assert_eq!(
            text,
            "Unknown command /foo. Available commands: /start, /add, /today, /month"
        );
    }

    #[test]
    fn welcome_lists_commands() {
        let (text, _) = render_reply(&Reply::Welcome, &model());
        for command in Command::KNOWN {
            assert!(text.contains(command), "{command} missing from welcome");
        }
    }

    #[test]
    fn invalid_amount_mentions_the_decimal_limit() {
        let reply = Reply::InvalidAmount {
            category: "Meals".to_string(),
        };
        let (text, _) = render_reply(&reply, &model());
        assert!(text.contains("at most two decimals"), "{text}");
    }
}
