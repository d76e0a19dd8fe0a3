//! Table of the most recent transactions with delete buttons.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::Transaction,
};

/// How many transactions the dashboard lists.
pub(super) const RECENT_TRANSACTIONS_LIMIT: u32 = 10;

/// Renders the recent transactions, newest first.
///
/// Each row has a button that deletes the transaction and removes the row.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        section id="recent-transactions" class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Source" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                td class=(TABLE_CELL_STYLE) { (transaction.transaction_type.label()) }
                                td class=(TABLE_CELL_STYLE) { (transaction.source) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (transaction.description.as_deref().unwrap_or_default())
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    button
                                        hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction.id))
                                        hx-confirm={
                                            "Are you sure you want to delete the "
                                            (transaction.transaction_type) " from "
                                            (transaction.source) "?"
                                        }
                                        hx-target="closest tr"
                                        hx-target-error="#alert-container"
                                        hx-swap="delete"
                                        class=(BUTTON_DELETE_STYLE)
                                    {
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
