use crate::api::AdminApi;
use crate::app::Dashboard;
use crate::chart::{Chart, ChartAdapter};
use crate::models::PeriodKey;
use crate::status::ExpirationStatus;
use crate::tables::{ClickRow, RowAction, UserRow};

const USER_HEADERS: [&str; 7] = ["ID", "Email", "Username", "Admin", "Expires", "Last analysis", "Actions"];
const CLICK_HEADERS: [&str; 4] = ["ID", "User", "Button", "When"];

pub fn render_dashboard<A: AdminApi, C: ChartAdapter>(dashboard: &Dashboard<A, C>) -> String {
    let stats = dashboard.stats();
    [
        render_users(dashboard.users().rows()),
        render_clicks(dashboard.clicks().rows()),
        render_chart(stats.period(), stats.chart()),
    ]
    .join("\n")
}

pub fn render_users(rows: &[UserRow]) -> String {
    let body = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.email.clone(),
                row.username.clone(),
                (if row.is_admin { "yes" } else { "no" }).to_string(),
                expiration_cell(&row.expiration),
                row.last_analysis.clone(),
                row.actions.iter().map(action_label).collect::<Vec<_>>().join(" "),
            ]
        })
        .collect::<Vec<_>>();
    render_table("Users", &USER_HEADERS, &body)
}

pub fn render_clicks(rows: &[ClickRow]) -> String {
    let body = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.actor.clone(),
                row.button.clone(),
                row.clicked_at.clone(),
            ]
        })
        .collect::<Vec<_>>();
    render_table("Clicks", &CLICK_HEADERS, &body)
}

pub fn render_chart<C: Chart>(period: PeriodKey, chart: Option<&C>) -> String {
    let mut out = format!("== Click stats ({period}) ==\n");
    match chart {
        Some(chart) => {
            for line in chart.lines() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        None => out.push_str("(no statistics loaded)\n"),
    }
    out
}

fn expiration_cell(status: &ExpirationStatus) -> String {
    match status {
        ExpirationStatus::Expired => format!("*{status}*"),
        _ => status.to_string(),
    }
}

fn action_label(action: &RowAction) -> String {
    match action {
        RowAction::Edit(id) => format!("[edit {id}]"),
        RowAction::Renew(id) => format!("[renew {id}]"),
        RowAction::Delete(id) => format!("[delete {id}]"),
    }
}

fn render_table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<w$}", w = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("== {title} ({}) ==\n", rows.len());
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
