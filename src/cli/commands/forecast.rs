use chrono::NaiveDate;
use flowcast_core::{
    BillingService, DateFormatter, ForecastOptions, ForecastService, SnapshotSource,
};
use flowcast_domain::{CardBill, ForecastReport, LoanStatusReport};

use crate::cli::{
    args::ParsedArgs,
    context::CliContext,
    output,
    registry::CommandEntry,
    ui::{Table, TableColumn, TableRenderer},
    CommandResult,
};
use crate::errors::CliError;

const NOT_AVAILABLE: &str = "n/a";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "forecast",
            "Project balances, risk and upcoming obligations",
            "forecast [--user U] [--as-of YYYY-MM-DD] [--horizon N] [--json]",
            cmd_forecast,
        ),
        CommandEntry::new(
            "loans",
            "Show remaining balance and payoff date per loan",
            "loans [--user U] [--as-of YYYY-MM-DD] [--json]",
            cmd_loans,
        ),
        CommandEntry::new(
            "bills",
            "Show card bills due this month and next",
            "bills [--user U] [--as-of YYYY-MM-DD] [--json]",
            cmd_bills,
        ),
    ]
}

struct Request {
    user: String,
    as_of: NaiveDate,
    options: ForecastOptions,
    json: bool,
}

fn parse_request(context: &CliContext, args: &[&str], horizon: bool) -> Result<Request, CliError> {
    let value_options: &[&str] = if horizon {
        &["user", "as-of", "horizon"]
    } else {
        &["user", "as-of"]
    };
    let parsed = ParsedArgs::parse(args, value_options, &["json"])?;
    if let Some(extra) = parsed.positionals().first() {
        return Err(CliError::Input(format!("unexpected argument `{extra}`")));
    }
    Ok(Request {
        user: context.resolve_user(parsed.value("user"))?,
        as_of: context.resolve_as_of(parsed.value("as-of"))?,
        options: context.forecast_options(parsed.value("horizon"))?,
        json: parsed.flag("json"),
    })
}

fn cmd_forecast(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let request = parse_request(context, args, true)?;
    let storage = context.storage()?;
    let report = ForecastService::project(&storage, &request.user, request.as_of, request.options)?;

    if request.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|err| CliError::Command(format!("cannot encode report: {err}")))?;
        output::info(json);
        return Ok(());
    }

    print_report(context, &request.user, &report);
    warn_skipped(context, report.skipped_records);
    Ok(())
}

fn cmd_loans(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let request = parse_request(context, args, false)?;
    let snapshot = context.storage()?.load_snapshot(&request.user, request.as_of)?;
    let loans = ForecastService::loan_reports(&snapshot, request.as_of);
    if request.json {
        return print_json(&loans);
    }
    print_loans(context, &loans);
    warn_skipped(context, snapshot.skipped);
    Ok(())
}

fn cmd_bills(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let request = parse_request(context, args, false)?;
    let snapshot = context.storage()?.load_snapshot(&request.user, request.as_of)?;
    let bills =
        BillingService::upcoming_bills(&snapshot.sources, &snapshot.transactions, request.as_of);
    if request.json {
        return print_json(&bills);
    }
    print_bills(context, &bills);
    warn_skipped(context, snapshot.skipped);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::Command(format!("cannot encode output: {err}")))?;
    output::info(json);
    Ok(())
}

fn print_report(context: &CliContext, user: &str, report: &ForecastReport) {
    let fmt = &context.formatters;
    let style = &context.style;
    let risk = &report.risk;

    output::header(
        style,
        format!(
            "Forecast for {user}: {} to {}",
            fmt.format_date(report.window.start),
            fmt.format_date(report.window.end)
        ),
    );
    let mut rows = vec![
        ("Start balance", fmt.amount(report.start_balance)),
        ("Balance today", fmt.amount(report.balance_today)),
        ("End balance", fmt.amount(report.end_balance())),
        ("Subscriptions / month", fmt.amount(report.monthly_subscription_cost)),
    ];
    if let Some(lowest) = &risk.evidence.lowest_balance {
        rows.push((
            "Lowest point",
            format!("{} on {}", fmt.amount(lowest.balance), fmt.format_date(lowest.date)),
        ));
    }
    rows.push((
        "Risk",
        style.apply_risk_style(risk.level, &risk.level.to_string()),
    ));
    rows.push(("Summary", risk.summary.clone()));
    rows.push((
        "Next step",
        format!(
            "{}: {}",
            style.apply_highlight_style(risk.recommended_action.title()),
            risk.recommended_action.detail()
        ),
    ));
    output::two_column(&rows);

    let mut table = Table::new(
        Some("Timeline"),
        vec![
            TableColumn::new("Date", 10),
            TableColumn::new("Label", 24),
            TableColumn::new("Source", 12),
            TableColumn::new("Status", 9),
            TableColumn::right("Amount", 12),
            TableColumn::right("Balance", 12),
        ],
    );
    for (event, point) in report.events.iter().zip(&report.balances) {
        table.add_row(vec![
            fmt.format_date(event.date),
            event.label.clone(),
            event.source.to_string(),
            event.status.to_string(),
            fmt.number(event.amount),
            fmt.number(point.balance),
        ]);
    }
    if table.is_empty() {
        output::info("No scheduled events in the forecast window.");
    } else {
        TableRenderer::render(&table, style);
    }

    if !report.loans.is_empty() {
        print_loans(context, &report.loans);
    }
    if !report.upcoming_bills.is_empty() {
        print_bills(context, &report.upcoming_bills);
    }
}

fn warn_skipped(context: &CliContext, skipped: usize) {
    if skipped > 0 {
        output::warning(
            &context.style,
            format!("{skipped} malformed record(s) were skipped"),
        );
    }
}

fn print_loans(context: &CliContext, loans: &[LoanStatusReport]) {
    if loans.is_empty() {
        output::info("No loans on record.");
        return;
    }
    let fmt = &context.formatters;
    let mut table = Table::new(
        Some("Loans"),
        vec![
            TableColumn::new("Loan", 20),
            TableColumn::right("Principal", 12),
            TableColumn::right("Repaid", 12),
            TableColumn::right("Remaining", 12),
            TableColumn::new("Next due", 10),
            TableColumn::new("Payoff", 10),
            TableColumn::right("Left", 5),
        ],
    );
    for loan in loans {
        let projection = &loan.projection;
        let date_or_na = |date: Option<NaiveDate>| {
            date.map(|date| fmt.format_date(date))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        table.add_row(vec![
            loan.name.clone(),
            fmt.number(loan.principal),
            fmt.number(loan.repaid),
            fmt.number(loan.remaining_balance),
            date_or_na(projection.next_due_date),
            date_or_na(projection.payoff_date),
            projection
                .remaining_installments
                .map(|count| count.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ]);
    }
    TableRenderer::render(&table, &context.style);
}

fn print_bills(context: &CliContext, bills: &[CardBill]) {
    if bills.is_empty() {
        output::info("No card bills due this month or next.");
        return;
    }
    let fmt = &context.formatters;
    let mut table = Table::new(
        Some("Upcoming card bills"),
        vec![
            TableColumn::new("Card", 20),
            TableColumn::new("Due", 10),
            TableColumn::right("Purchases", 9),
            TableColumn::right("Amount", 12),
        ],
    );
    for bill in bills {
        table.add_row(vec![
            bill.card_name.clone(),
            fmt.format_date(bill.payment_date),
            bill.transaction_count.to_string(),
            fmt.number(bill.amount),
        ]);
    }
    TableRenderer::render(&table, &context.style);
}
