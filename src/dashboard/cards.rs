//! The monthly statistics box for the dashboard.

use maud::{Markup, html};

use crate::{html::format_currency, month::SaleMonth, transaction::query::MonthlyStatistics};

/// Renders the statistics box for the selected month.
pub(super) fn statistics_card(month: SaleMonth, statistics: &MonthlyStatistics) -> Markup {
    html! {
        section id="statistics" class="card"
        {
            h2 { "Statistics - " (month.month_name()) " " (month.year) }

            dl
            {
                div class="stat"
                {
                    dt { "Total sale" }
                    dd { (format_currency(statistics.total_sale_amount)) }
                }

                div class="stat"
                {
                    dt { "Total sold items" }
                    dd { (statistics.total_sold_items) }
                }

                div class="stat"
                {
                    dt { "Total not sold items" }
                    dd { (statistics.total_unsold_items) }
                }
            }
        }
    }
}
