//! Forms for adding a transaction and importing a CSV file from the dashboard.

use maud::{Markup, html};
use time::OffsetDateTime;

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE},
    transaction::TransactionType,
};

/// The form for adding a single transaction.
///
/// The date defaults to today (UTC).
pub(super) fn add_transaction_form() -> Markup {
    let today = OffsetDateTime::now_utc().date();

    html! {
        form
            hx-post=(endpoints::TRANSACTIONS)
            hx-target-error="#alert-container"
            class={(CARD_STYLE) " space-y-4"}
        {
            h3 class="text-xl font-semibold" { "Add Transaction" }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                select name="type" id="type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for transaction_type in TransactionType::ALL {
                        option value=(transaction_type.as_str()) { (transaction_type.label()) }
                    }
                }
            }

            div
            {
                label for="source" class=(FORM_LABEL_STYLE) { "Source" }
                input
                    type="text"
                    name="source"
                    id="source"
                    placeholder="e.g. Salary, Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    type="number"
                    name="amount"
                    id="amount"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="Optional"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    }
}

/// The form for importing transactions from a CSV file, and the export link.
pub(super) fn import_export_form() -> Markup {
    html! {
        div class={(CARD_STYLE) " space-y-4"}
        {
            form
                hx-post=(endpoints::UPLOAD)
                hx-encoding="multipart/form-data"
                hx-target-error="#alert-container"
                hx-swap="none"
                class="space-y-4"
            {
                h3 class="text-xl font-semibold" { "Import Transactions" }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Upload a CSV file with the columns date, type, source, amount
                    and optionally description."
                }

                input
                    type="file"
                    name="files"
                    id="files"
                    accept=".csv,text/csv"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload" }
            }

            p
            {
                a href=(endpoints::EXPORT) class=(LINK_STYLE) { "Export all transactions as CSV" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        test_utils::{assert_form_input, assert_form_submit_button, assert_hx_endpoint, must_get_form},
    };

    use super::{add_transaction_form, import_export_form};

    #[test]
    fn add_form_has_required_inputs() {
        let html = Html::parse_fragment(&add_transaction_form().into_string());
        let form = must_get_form(&html);

        assert_hx_endpoint(&form, endpoints::TRANSACTIONS, "hx-post");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "source", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);

        let options: Vec<&str> = form
            .select(&Selector::parse("select[name='type'] option").unwrap())
            .map(|option| option.value().attr("value").unwrap())
            .collect();
        assert_eq!(options, ["income", "expense", "investment"]);
    }

    #[test]
    fn import_form_posts_multipart() {
        let html = Html::parse_fragment(&import_export_form().into_string());
        let form = must_get_form(&html);

        assert_hx_endpoint(&form, endpoints::UPLOAD, "hx-post");
        assert_hx_endpoint(&form, "multipart/form-data", "hx-encoding");
        assert_form_input(&form, "files", "file");

        let export_link = html
            .select(&Selector::parse("a").unwrap())
            .next()
            .expect("No export link found");
        assert_eq!(export_link.value().attr("href"), Some(endpoints::EXPORT));
    }
}
