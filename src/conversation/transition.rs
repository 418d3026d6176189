//! The pure step function of the conversation.

use chrono::NaiveDate;

use super::effect::{Effect, Reply};
use super::event::{is_cancel, slash_command, Event, MenuAction};
use super::state::ConvState;
use crate::deletion::Selection;
use crate::error::ValidationError;
use crate::models::{check_split, InstallmentPlan, Kind, NewTransaction, UserId};
use crate::parse::{format_date, parse_amount, parse_date, parse_installment_count, MAX_AMOUNT};
use crate::util::format_amount;

const DATE_PROMPT: &str = "📅 Enter the date (DD/MM/YYYY, DD/MM or 'today'):";
const WHAT_NEXT: &str = "🌟 What would you like to do next?";

/// The next state and the effects to run to get there.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transition {
    pub(crate) state: ConvState,
    pub(crate) effects: Vec<Effect>,
}

impl Transition {
    fn to(state: ConvState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    /// Stay put and explain what was wrong with the input.
    fn retry(state: ConvState, err: &ValidationError) -> Self {
        Self::to(state, vec![Effect::Reply(reprompt(err))])
    }

    fn idle(effects: Vec<Effect>) -> Self {
        Self::to(ConvState::Idle, effects)
    }
}

/// Advance `state` by one event. `today` resolves relative dates.
pub(crate) fn transition(state: ConvState, event: &Event, today: NaiveDate) -> Transition {
    match event {
        Event::Selection { choice_id, .. } => on_selection(choice_id),
        Event::Text { user, text } => {
            if state.is_idle() {
                return on_menu(text);
            }
            if is_cancel(text) {
                return Transition::idle(vec![reply_menu("Operation cancelled. 😉")]);
            }
            if slash_command(text).is_some() {
                // Commands are not answers to the current prompt
                return Transition::idle(vec![reply_menu(
                    "⚠️ The current operation was abandoned. Choose an option below.",
                )]);
            }
            on_field(state, *user, text, today)
        }
    }
}

fn on_selection(choice_id: &str) -> Transition {
    match Selection::parse(choice_id) {
        Some(selection) => Transition::idle(vec![Effect::Delete(selection)]),
        None => Transition::idle(vec![reply_menu("❓ That option is no longer available.")]),
    }
}

fn on_menu(text: &str) -> Transition {
    let Some(action) = MenuAction::parse(text) else {
        if slash_command(text).as_deref() == Some("/start") {
            return Transition::idle(vec![reply_menu(
                "👋 Hi! What would you like to do?\nPick an option below:",
            )]);
        }
        return Transition::idle(vec![reply_menu(
            "❓ Choose a valid option from the buttons below.",
        )]);
    };

    let ask = |prompt: &str| vec![Effect::Reply(Reply::cancelable(prompt))];
    match action {
        MenuAction::NewExpense => Transition::to(
            ConvState::AwaitingAmount {
                kind: Kind::Expense,
            },
            ask("💸 How much was the expense?"),
        ),
        MenuAction::NewIncome => Transition::to(
            ConvState::AwaitingAmount { kind: Kind::Income },
            ask("💰 How much was the income?"),
        ),
        MenuAction::SaveMoney => Transition::to(
            ConvState::AwaitingAmount { kind: Kind::Saved },
            ask("🏦 How much do you want to save?"),
        ),
        MenuAction::InstallmentPurchase => Transition::to(
            ConvState::AwaitingInstallmentTotal,
            ask("💳 What is the total amount of the purchase?"),
        ),
        MenuAction::Balance => Transition::idle(vec![Effect::ShowSummary]),
        MenuAction::Chart => Transition::idle(vec![Effect::ShowChart]),
        MenuAction::DeleteRecord => Transition::idle(vec![Effect::OfferDeletion]),
    }
}

fn on_field(state: ConvState, user: UserId, text: &str, today: NaiveDate) -> Transition {
    let ask = |prompt: String| vec![Effect::Reply(Reply::cancelable(prompt))];

    match state {
        ConvState::Idle => on_menu(text),

        ConvState::AwaitingAmount { kind } => match parse_amount(text) {
            Ok(amount) => Transition::to(
                ConvState::AwaitingDate { kind, amount },
                ask(DATE_PROMPT.into()),
            ),
            Err(err) => Transition::retry(state, &err),
        },

        ConvState::AwaitingDate { kind, amount } => match parse_date(text, today) {
            Some(date) => Transition::to(
                ConvState::AwaitingDescription { kind, amount, date },
                ask("📝 Write a short description:".into()),
            ),
            None => Transition::retry(state, &ValidationError::InvalidDate),
        },

        ConvState::AwaitingDescription { kind, amount, date } => {
            if text.trim().is_empty() {
                return Transition::retry(state, &ValidationError::EmptyDescription);
            }
            let record = NewTransaction::standalone(user, kind, amount, date, text.to_string());
            let confirmation = format!(
                "✅ {} Record saved!\n➡️ Amount: {}\n📅 Date: {}\n📝 Description: {}",
                kind.icon(),
                format_amount(amount),
                format_date(date),
                record.description,
            );
            Transition::idle(vec![
                Effect::Persist(record),
                Effect::Reply(Reply::new(confirmation, Default::default())),
                Effect::ShowSummary,
                Effect::Reply(Reply::menu(WHAT_NEXT)),
            ])
        }

        ConvState::AwaitingInstallmentTotal => match parse_amount(text) {
            Ok(total) => Transition::to(
                ConvState::AwaitingInstallmentCount { total },
                ask("🔢 In how many installments?".into()),
            ),
            Err(err) => Transition::retry(state, &err),
        },

        ConvState::AwaitingInstallmentCount { total } => {
            match parse_installment_count(text).and_then(|count| {
                check_split(total, count)?;
                Ok(count)
            }) {
                Ok(count) => Transition::to(
                    ConvState::AwaitingInstallmentFirstDate { total, count },
                    ask("📅 Date of the first installment (DD/MM/YYYY, DD/MM or 'today'):".into()),
                ),
                Err(err) => Transition::retry(state, &err),
            }
        }

        ConvState::AwaitingInstallmentFirstDate { total, count } => match parse_date(text, today)
        {
            Some(first_date) => Transition::to(
                ConvState::AwaitingInstallmentDescription {
                    total,
                    count,
                    first_date,
                },
                ask("📝 Write a description for the purchase:".into()),
            ),
            None => Transition::retry(state, &ValidationError::InvalidDate),
        },

        ConvState::AwaitingInstallmentDescription {
            total,
            count,
            first_date,
        } => {
            if text.trim().is_empty() {
                return Transition::retry(state, &ValidationError::EmptyDescription);
            }
            let plan = match InstallmentPlan::new(total, count, first_date, text.to_string()) {
                Ok(plan) => plan,
                Err(err) => return Transition::retry(state, &err),
            };
            let confirmation = format!(
                "✅ {} installments of {} recorded!\n🗓️ From {} to {}\n📝 Description: {}",
                plan.installment_count,
                format_amount(plan.per_installment_amount()),
                format_date(plan.first_date),
                format_date(plan.last_date()),
                plan.base_description,
            );
            Transition::idle(vec![
                Effect::PersistInstallments(plan),
                Effect::Reply(Reply::new(confirmation, Default::default())),
                Effect::ShowSummary,
                Effect::Reply(Reply::menu(WHAT_NEXT)),
            ])
        }
    }
}

fn reply_menu(text: &str) -> Effect {
    Effect::Reply(Reply::menu(text))
}

fn reprompt(err: &ValidationError) -> Reply {
    let text: String = match err {
        ValidationError::InvalidAmount => "⛔ Invalid amount! Type only numbers, e.g. 12.50".into(),
        ValidationError::NonPositiveAmount => "⛔ The amount must be greater than zero.".into(),
        ValidationError::AmountTooLarge => {
            format!("⛔ That amount is too large. The maximum is {}.", format_amount(MAX_AMOUNT))
        }
        ValidationError::InvalidDate => "⛔ Invalid date! Use DD/MM/YYYY, DD/MM or 'today'.".into(),
        ValidationError::CountNotInteger => "⛔ Type a whole number of installments.".into(),
        ValidationError::CountOutOfRange { min, max } => {
            format!("⛔ The number of installments must be between {min} and {max}.")
        }
        ValidationError::InstallmentTooSmall => {
            "⛔ The total is too small for that many installments. Try fewer.".into()
        }
        ValidationError::EmptyDescription => "⛔ The description cannot be empty.".into(),
    };
    Reply::cancelable(text)
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
