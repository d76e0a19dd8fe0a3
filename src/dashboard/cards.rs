//! Summary cards showing the total of each transaction type and net savings.

use maud::{Markup, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    aggregation::Totals,
    html::{CARD_STYLE, format_currency, format_signed_currency},
    transaction::TransactionType,
};

const CARD_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const CARD_RED_STYLE: &str = "text-red-600 dark:text-red-400";
const CARD_PURPLE_STYLE: &str = "text-purple-600 dark:text-purple-400";

fn type_text_style(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => CARD_GREEN_STYLE,
        TransactionType::Expense => CARD_RED_STYLE,
        TransactionType::Investment => CARD_PURPLE_STYLE,
    }
}

fn card(id: &str, title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h5 class="mb-2 text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class={"text-2xl font-bold " (value_style)} { (value) }
        }
    }
}

/// Renders a card per transaction type followed by a net savings card.
///
/// Net savings is green when zero or above and red when negative.
pub(super) fn totals_cards_view(totals: &Totals) -> Markup {
    let net_savings = totals.net_savings.to_f64().unwrap_or_default();
    let net_savings_style = if totals.net_savings < Decimal::ZERO {
        CARD_RED_STYLE
    } else {
        CARD_GREEN_STYLE
    };

    html! {
        section id="totals" class="w-full grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4 mb-8"
        {
            @for transaction_type in TransactionType::ALL {
                (card(
                    &format!("total-{}", transaction_type.as_str()),
                    &format!("Total {}", transaction_type.label()),
                    &format_currency(totals.get(transaction_type)),
                    type_text_style(transaction_type),
                ))
            }

            (card(
                "net-savings",
                "Net Savings",
                &format_signed_currency(net_savings),
                net_savings_style,
            ))
        }
    }
}
