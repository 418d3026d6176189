use crate::models::UserId;

/// One inbound turn from the chat layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    /// A typed message or a reply-keyboard button press.
    Text { user: UserId, text: String },
    /// A click on one of the choices offered in a reply.
    Selection { user: UserId, choice_id: String },
}

impl Event {
    pub(crate) fn text(user: UserId, text: impl Into<String>) -> Self {
        Self::Text {
            user,
            text: text.into(),
        }
    }

    pub(crate) fn selection(user: UserId, choice_id: impl Into<String>) -> Self {
        Self::Selection {
            user,
            choice_id: choice_id.into(),
        }
    }

    pub(crate) fn user(&self) -> UserId {
        match self {
            Self::Text { user, .. } | Self::Selection { user, .. } => *user,
        }
    }
}

/// Entry points offered by the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuAction {
    NewExpense,
    NewIncome,
    SaveMoney,
    InstallmentPurchase,
    Balance,
    Chart,
    DeleteRecord,
}

impl MenuAction {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::NewExpense => "💸 New expense",
            Self::NewIncome => "💰 New income",
            Self::SaveMoney => "🏦 Save money",
            Self::InstallmentPurchase => "💳 Installment purchase",
            Self::Balance => "📊 Balance",
            Self::Chart => "📈 Chart",
            Self::DeleteRecord => "🗑️ Delete record",
        }
    }

    /// Menu rows as shown on the reply keyboard.
    pub(crate) fn rows() -> &'static [&'static [MenuAction]] {
        &[
            &[Self::NewExpense, Self::NewIncome],
            &[Self::InstallmentPurchase, Self::SaveMoney],
            &[Self::Balance, Self::Chart, Self::DeleteRecord],
        ]
    }

    /// Match either the button label or the bare words, in any case.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        match normalize(text).as_str() {
            "new expense" => Some(Self::NewExpense),
            "new income" => Some(Self::NewIncome),
            "save money" => Some(Self::SaveMoney),
            "installment purchase" => Some(Self::InstallmentPurchase),
            "balance" => Some(Self::Balance),
            "chart" => Some(Self::Chart),
            "delete record" => Some(Self::DeleteRecord),
            _ => None,
        }
    }
}

pub(crate) const CANCEL_LABEL: &str = "❌ Cancel";

pub(crate) fn is_cancel(text: &str) -> bool {
    matches!(normalize(text).as_str(), "cancel" | "/cancel")
}

/// A `/command` typed by the user, lowercased, if the text is one.
pub(crate) fn slash_command(text: &str) -> Option<String> {
    let normalized = normalize(text);
    normalized.starts_with('/').then_some(normalized)
}

/// Drop leading emoji and punctuation, squeeze whitespace, lowercase.
fn normalize(text: &str) -> String {
    text.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '/')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for row in MenuAction::rows() {
            for action in *row {
                assert_eq!(MenuAction::parse(action.label()), Some(*action));
            }
        }
    }

    #[test]
    fn test_bare_words_parse() {
        assert_eq!(MenuAction::parse("new expense"), Some(MenuAction::NewExpense));
        assert_eq!(MenuAction::parse("  Save   MONEY "), Some(MenuAction::SaveMoney));
        assert_eq!(MenuAction::parse("expense"), None);
    }

    #[test]
    fn test_cancel_forms() {
        assert!(is_cancel(CANCEL_LABEL));
        assert!(is_cancel("cancel"));
        assert!(is_cancel("/cancel"));
        assert!(!is_cancel("cancelled"));
        assert!(!is_cancel("12.50"));
    }

    #[test]
    fn test_slash_command() {
        assert_eq!(slash_command("/start").as_deref(), Some("/start"));
        assert_eq!(slash_command("/Help me").as_deref(), Some("/help me"));
        assert_eq!(slash_command("hello"), None);
    }
}
