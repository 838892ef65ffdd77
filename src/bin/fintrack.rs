//! CLI binary for browsing finance tracker data from the terminal.

use std::io::{self, BufRead as _, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use fintrack_rs::analytics::{
    self, CategorySummary, SavingsProgress, collapse_tail, monthly_trend_now, savings_progress,
};
use fintrack_rs::models::{
    BalanceSummary, BudgetComparison, BudgetComparisonSummary, BudgetItem, CategoryComparison,
    LoginRequest, MonthlyTrendPoint, NaiveDate, RegisterRequest, SavingsGoal, SortBy, SortOrder,
    Transaction, TransactionKind, TransactionPage, TransactionQuery,
};
use fintrack_rs::storage::FileCredentialStore;
use fintrack_rs::{ApiClient, ApiError, ApiResult};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Environment variable overriding the API base URL.
const API_URL_ENV: &str = "FINTRACK_API_URL";

/// Environment variable overriding the auth base URL.
const AUTH_URL_ENV: &str = "FINTRACK_AUTH_URL";

/// Environment variable supplying the password non-interactively.
const PASSWORD_ENV: &str = "FINTRACK_PASSWORD";

/// Page size used when collecting transactions for local aggregation.
const COLLECT_PAGE_SIZE: u32 = 100;

/// Label of the collapsed tail in category breakdowns.
const OTHER_LABEL: &str = "Other";

/// Client type used by every command.
type Client = ApiClient<FileCredentialStore>;

/// Finance tracker CLI: sign in and inspect transactions, budgets,
/// savings and trends.
#[derive(Debug, Parser)]
#[command(name = "fintrack", version, about)]
struct Cli {
    /// Override the credential directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Keep the session alive longer.
        #[arg(long)]
        remember_me: bool,
    },
    /// Create an account and sign in.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Account email.
        #[arg(long)]
        email: String,
    },
    /// Sign out and forget the stored session.
    Logout,
    /// Exchange the refresh token for a new access token.
    Refresh,
    /// List transactions, optionally filtered.
    Transactions(TransactionArgs),
    /// Income, expenses and balance of the current period.
    Summary,
    /// Budgeted versus actual amounts per category.
    Budget,
    /// Expense share per category.
    Spending {
        /// Number of categories shown before the rest is grouped.
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Start date (inclusive, YYYY-MM-DD). Requires --to.
        #[arg(long, requires = "to", value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// End date (inclusive, YYYY-MM-DD). Requires --from.
        #[arg(long, requires = "from", value_parser = parse_date)]
        to: Option<NaiveDate>,
    },
    /// Monthly income and expenses.
    Trend {
        /// Number of months, ending with the current one.
        #[arg(long, default_value_t = 6)]
        months: u32,
        /// Aggregate locally from the transaction list instead of asking
        /// the statistics service.
        #[arg(long)]
        local: bool,
    },
    /// Progress of every savings goal.
    Savings,
}

/// Arguments for the `transactions` subcommand.
#[derive(Debug, Args)]
struct TransactionArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Records per page.
    #[arg(long, default_value_t = 10)]
    page_size: u32,
    /// Only `income` or `expense`.
    #[arg(long = "type", value_parser = parse_kind)]
    kind: Option<TransactionKind>,
    /// Sort field: `date` or `amount`.
    #[arg(long, value_parser = parse_sort_by)]
    sort_by: Option<SortBy>,
    /// Sort direction: `asc` or `desc`.
    #[arg(long, value_parser = parse_sort_order)]
    sort_order: Option<SortOrder>,
    /// Start date (inclusive, YYYY-MM-DD). Requires --to.
    #[arg(long, requires = "to", value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD). Requires --from.
    #[arg(long, requires = "from", value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Minimum amount. Requires --max-amount.
    #[arg(long, requires = "max_amount")]
    min_amount: Option<f64>,
    /// Maximum amount. Requires --min-amount.
    #[arg(long, requires = "min_amount")]
    max_amount: Option<f64>,
    /// Category name.
    #[arg(long)]
    category: Option<String>,
}

impl TransactionArgs {
    /// Builds the listing query.
    fn to_query(&self) -> TransactionQuery {
        let mut query = TransactionQuery::new()
            .page(self.page)
            .page_size(self.page_size);
        if let Some(kind) = self.kind {
            query = query.kind(kind);
        }
        if let Some(by) = self.sort_by {
            query = query.sort_by(by);
        }
        if let Some(order) = self.sort_order {
            query = query.sort_order(order);
        }
        if let Some((from, to)) = self.from.zip(self.to) {
            query = query.date_range(from, to);
        }
        if let Some((min, max)) = self.min_amount.zip(self.max_amount) {
            query = query.amount_range(min, max);
        }
        if let Some(name) = self.category.as_deref() {
            query = query.category(name);
        }
        query
    }
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a transaction kind for clap.
fn parse_kind(s: &str) -> Result<TransactionKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        other => Err(format!("expected `income` or `expense`, got `{other}`")),
    }
}

/// Parses a sort field for clap.
fn parse_sort_by(s: &str) -> Result<SortBy, String> {
    match s.to_ascii_lowercase().as_str() {
        "date" => Ok(SortBy::Date),
        "amount" => Ok(SortBy::Amount),
        other => Err(format!("expected `date` or `amount`, got `{other}`")),
    }
}

/// Parses a sort direction for clap.
fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    match s.to_ascii_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(format!("expected `asc` or `desc`, got `{other}`")),
    }
}

/// Creates the credential store, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_store(data_dir: Option<PathBuf>) -> fintrack_rs::Result<FileCredentialStore> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileCredentialStore::default_dir()?,
    };
    FileCredentialStore::new(dir)
}

/// Builds the API client from the environment.
fn create_client(store: FileCredentialStore) -> fintrack_rs::Result<Client> {
    let mut builder = ApiClient::builder().credential_store(store);
    if let Some(url) = env_value(API_URL_ENV) {
        builder = builder.base_url(url);
    }
    if let Some(url) = env_value(AUTH_URL_ENV) {
        builder = builder.auth_base_url(url);
    }
    builder.build()
}

/// Reads a non-empty environment variable.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Reads the password from the environment or, failing that, one line
/// of standard input.
fn read_password() -> io::Result<String> {
    if let Some(password) = env_value(PASSWORD_ENV) {
        return Ok(password);
    }
    {
        let mut err = io::stderr().lock();
        write!(err, "{} ", "Password:".bold())?;
        err.flush()?;
    }
    let mut line = String::new();
    let _read = io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Runs the CLI, returning an appropriate exit code.
async fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let store = match create_store(cli.data_dir) {
        Ok(store) => store,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to initialize credential storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = match create_client(store) {
        Ok(client) => client,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    dispatch(&client, cli.command).await
}

/// Dispatches to the appropriate subcommand handler.
async fn dispatch(client: &Client, command: Command) -> io::Result<ExitCode> {
    match command {
        Command::Login { email, remember_me } => cmd_login(client, email, remember_me).await,
        Command::Register { name, email } => cmd_register(client, name, email).await,
        Command::Logout => cmd_logout(client).await,
        Command::Refresh => cmd_refresh(client).await,
        Command::Transactions(args) => cmd_transactions(client, &args).await,
        Command::Summary => cmd_summary(client).await,
        Command::Budget => cmd_budget(client).await,
        Command::Spending { top, from, to } => cmd_spending(client, top, from.zip(to)).await,
        Command::Trend { months, local } => cmd_trend(client, months, local).await,
        Command::Savings => cmd_savings(client).await,
    }
}

/// Prints an API failure, with a hint when the session is gone.
fn report(action: &str, err: &ApiError) -> io::Result<ExitCode> {
    let mut out = io::stderr().lock();
    writeln!(out, "{} {action}: {err}", "error:".red().bold())?;
    if err.is_auth_expired() {
        writeln!(out, "  {} run `fintrack login --email <email>`", "hint:".cyan())?;
    }
    Ok(ExitCode::FAILURE)
}

// ── Session commands ────────────────────────────────────────────────

/// Executes the `login` subcommand.
async fn cmd_login(client: &Client, email: String, remember_me: bool) -> io::Result<ExitCode> {
    let password = read_password()?;
    let request = LoginRequest::new(email, password).remember_me(remember_me);
    let spinner = make_spinner("Signing in...");
    let outcome = client.login(&request).await;
    spinner.finish_and_clear();
    match outcome {
        Ok(session) => {
            let who = session
                .user
                .as_ref()
                .map_or_else(|| request.email.clone(), |user| user.email.clone());
            writeln!(io::stdout().lock(), "{} {who}", "Signed in as".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("login failed", &err),
    }
}

/// Executes the `register` subcommand.
async fn cmd_register(client: &Client, name: String, email: String) -> io::Result<ExitCode> {
    let password = read_password()?;
    let request = RegisterRequest::new(name, email, password);
    let spinner = make_spinner("Creating account...");
    let outcome = client.register(&request).await;
    spinner.finish_and_clear();
    match outcome {
        Ok(_session) => {
            writeln!(
                io::stdout().lock(),
                "{} {}",
                "Account created for".green().bold(),
                request.email
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("registration failed", &err),
    }
}

/// Executes the `logout` subcommand.
async fn cmd_logout(client: &Client) -> io::Result<ExitCode> {
    match client.logout().await {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Signed out.".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("logout failed", &err),
    }
}

/// Executes the `refresh` subcommand.
async fn cmd_refresh(client: &Client) -> io::Result<ExitCode> {
    match client.refresh_session().await {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{}", "Session refreshed.".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("refresh failed", &err),
    }
}

// ── Data commands ───────────────────────────────────────────────────

/// Executes the `transactions` subcommand.
async fn cmd_transactions(client: &Client, args: &TransactionArgs) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading transactions...");
    let outcome = client.transactions(&args.to_query()).await;
    spinner.finish_and_clear();
    match outcome {
        Ok(page) => {
            print_transactions_table(&page)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load transactions", &err),
    }
}

/// Executes the `summary` subcommand.
async fn cmd_summary(client: &Client) -> io::Result<ExitCode> {
    match client.balance_summary().await {
        Ok(summary) => {
            print_summary(&summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load summary", &err),
    }
}

/// Executes the `budget` subcommand.
async fn cmd_budget(client: &Client) -> io::Result<ExitCode> {
    match client.budget_comparison().await {
        Ok(comparison) => {
            print_budget(&comparison)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load budget comparison", &err),
    }
}

/// Executes the `spending` subcommand.
async fn cmd_spending(
    client: &Client,
    top: usize,
    period: Option<(NaiveDate, NaiveDate)>,
) -> io::Result<ExitCode> {
    match client.spending_by_category(period).await {
        Ok(spending) => {
            let amounts: Vec<(String, f64)> = spending
                .categories
                .iter()
                .map(|row| (row.category_name.clone(), row.amount))
                .collect();
            let breakdown = analytics::category_breakdown(&amounts, Some(spending.total_spending));
            print_breakdown(&collapse_tail(&breakdown, top, OTHER_LABEL))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load spending", &err),
    }
}

/// Executes the `trend` subcommand.
async fn cmd_trend(client: &Client, months: u32, local: bool) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading trends...");
    let outcome = if local {
        collect_transactions(client).await.map(|transactions| {
            monthly_trend_now(&transactions, months)
                .iter()
                .map(MonthlyTrendPoint::from)
                .collect()
        })
    } else {
        client.monthly_trends(months).await.map(|trends| trends.trends)
    };
    spinner.finish_and_clear();
    match outcome {
        Ok(points) => {
            print_trend(&points)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load trends", &err),
    }
}

/// Executes the `savings` subcommand.
async fn cmd_savings(client: &Client) -> io::Result<ExitCode> {
    match client.savings_progress().await {
        Ok(report_data) => {
            let goals: Vec<SavingsGoal> = report_data
                .goals
                .into_iter()
                .map(|goal| {
                    SavingsGoal::new(goal.id.into_string(), goal.category_name, goal.target, goal.saved)
                })
                .collect();
            print_savings(&goals, &savings_progress(&goals))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => report("failed to load savings progress", &err),
    }
}

/// Fetches every page of the transaction listing.
async fn collect_transactions(client: &Client) -> ApiResult<Vec<Transaction>> {
    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let query = TransactionQuery::new()
            .page(page)
            .page_size(COLLECT_PAGE_SIZE);
        let TransactionPage {
            transactions,
            has_more,
            ..
        } = client.transactions(&query).await?;
        all.extend(transactions);
        if !has_more {
            return Ok(all);
        }
        page += 1;
    }
}

/// Turns server comparison rows into budget lines.
fn budget_items(rows: &[CategoryComparison]) -> Vec<BudgetItem> {
    rows.iter()
        .map(|row| {
            let id = row
                .category_id
                .clone()
                .map_or_else(|| row.category_name.clone(), |id| id.into_string());
            BudgetItem::new(id, row.category_name.clone(), row.budgeted, row.actual)
        })
        .collect()
}

// ── Output formatting ────────────────────────────────────────────────

/// Formats a money amount.
fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Cell coloured by sign: green when favourable.
fn signed_cell(amount: f64) -> Cell {
    let color = if amount >= 0.0_f64 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(money(amount)).fg(color)
}

/// Table with the shared preset and a cyan header.
fn table_with_header(columns: &[&str]) -> Table {
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(
        columns
            .iter()
            .map(|title| Cell::new(title).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Prints one page of transactions in a table.
fn print_transactions_table(page: &TransactionPage) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if page.transactions.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = table_with_header(&["Date", "Category", "Amount", "Description"]);
    for tx in &page.transactions {
        let amount_cell = match tx.kind {
            TransactionKind::Income => Cell::new(money(tx.amount)).fg(Color::Green),
            TransactionKind::Expense => Cell::new(money(-tx.amount)).fg(Color::Red),
        };
        _ = table.add_row(vec![
            Cell::new(tx.date),
            Cell::new(&tx.category),
            amount_cell,
            Cell::new(&tx.description),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!(
            "(page {} of {} records{})",
            page.page,
            page.total_count,
            if page.has_more { ", more available" } else { "" }
        )
        .dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the balance summary.
fn print_summary(summary: &BalanceSummary) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        "Summary".green().bold(),
        format_args!(
            "({} to {})",
            summary.period.start_date, summary.period.end_date
        )
        .dimmed()
    )?;
    writeln!(out)?;

    let mut table = table_with_header(&["Metric", "Amount"]);
    let savings = &summary.savings_summary;
    let rows = [
        ("Income", Cell::new(money(summary.total_income))),
        ("Expenses", Cell::new(money(summary.total_expenses))),
        ("Balance", signed_cell(summary.balance)),
        ("Savings target", Cell::new(money(savings.total_savings_target))),
        ("Saved", Cell::new(money(savings.total_saved))),
        ("Savings progress", Cell::new(format!("{:.1}%", savings.savings_progress))),
    ];
    for (name, cell) in rows {
        _ = table.add_row(vec![Cell::new(name), cell]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints both budget tables and the recomputed totals.
fn print_budget(comparison: &BudgetComparison) -> io::Result<()> {
    let income = budget_items(&comparison.income_by_category);
    let expenses = budget_items(&comparison.expenses_by_category);
    let totals = analytics::budget_comparison(&income, &expenses);

    let mut out = io::stdout().lock();
    for (title, kind, items) in [
        ("Income", TransactionKind::Income, &income),
        ("Expenses", TransactionKind::Expense, &expenses),
    ] {
        writeln!(out, "{}", title.green().bold())?;
        if items.is_empty() {
            writeln!(out, "{}", "No budget lines.".dimmed())?;
            writeln!(out)?;
            continue;
        }
        let mut table = table_with_header(&["Category", "Budgeted", "Actual", "Difference"]);
        for item in items {
            _ = table.add_row(vec![
                Cell::new(&item.label),
                Cell::new(money(item.budgeted)),
                Cell::new(money(item.actual)),
                signed_cell(analytics::budget_difference(item, kind)),
            ]);
        }
        writeln!(out, "{table}")?;
        writeln!(out)?;
    }
    print_budget_totals(&mut out, &totals)
}

/// Prints the income, expense and net totals.
fn print_budget_totals<W: io::Write>(out: &mut W, totals: &BudgetComparisonSummary) -> io::Result<()> {
    let mut table = table_with_header(&["", "Budgeted", "Actual", "Difference", "Performance"]);
    for (name, line) in [("Income", &totals.income), ("Expenses", &totals.expenses)] {
        _ = table.add_row(vec![
            Cell::new(name),
            Cell::new(money(line.budgeted)),
            Cell::new(money(line.actual)),
            signed_cell(line.difference),
            Cell::new(format!("{:.1}%", line.performance * 100.0_f64)),
        ]);
    }
    _ = table.add_row(vec![
        Cell::new("Net"),
        Cell::new(money(totals.net.budgeted)),
        signed_cell(totals.net.actual),
        Cell::new(""),
        Cell::new(""),
    ]);
    writeln!(out, "{}", "Totals".green().bold())?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints a category breakdown with percentage shares.
fn print_breakdown(rows: &[CategorySummary]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows.is_empty() {
        writeln!(out, "{}", "No spending recorded.".dimmed())?;
        return Ok(());
    }
    let mut table = table_with_header(&["Category", "Amount", "Share"]);
    for row in rows {
        let name = if row.category == OTHER_LABEL {
            Cell::new(&row.category).fg(Color::DarkGrey)
        } else {
            Cell::new(&row.category)
        };
        _ = table.add_row(vec![
            name,
            Cell::new(money(row.amount)),
            Cell::new(format!("{:.1}%", row.percentage)),
        ]);
    }
    writeln!(out, "{}", "Spending by category".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints monthly totals, oldest first.
fn print_trend(points: &[MonthlyTrendPoint]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if points.is_empty() {
        writeln!(out, "{}", "No months to show.".dimmed())?;
        return Ok(());
    }
    let mut table = table_with_header(&["Month", "Income", "Expenses", "Balance"]);
    for point in points {
        _ = table.add_row(vec![
            Cell::new(&point.month),
            Cell::new(money(point.income)).fg(Color::Green),
            Cell::new(money(point.expenses)).fg(Color::Red),
            signed_cell(point.balance),
        ]);
    }
    writeln!(
        out,
        "{} {}",
        "Monthly trend".green().bold(),
        format_args!("({} months)", points.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints every goal and the aggregate progress.
fn print_savings(goals: &[SavingsGoal], progress: &SavingsProgress) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if goals.is_empty() {
        writeln!(out, "{}", "No savings goals.".dimmed())?;
        return Ok(());
    }
    let mut table = table_with_header(&["Goal", "Target", "Saved", "Remaining", "Progress"]);
    for goal in goals {
        let progress_cell = Cell::new(format!("{:.1}%", goal.progress_percent()));
        _ = table.add_row(vec![
            Cell::new(&goal.category),
            Cell::new(money(goal.target)),
            Cell::new(money(goal.saved)),
            Cell::new(money(goal.remaining())),
            if goal.is_complete() {
                progress_cell.fg(Color::Green)
            } else {
                progress_cell
            },
        ]);
    }
    writeln!(
        out,
        "{} {}",
        "Savings".green().bold(),
        format_args!(
            "({} of {} goals complete, {:.1}% overall)",
            progress.completed, progress.total_goals, progress.progress_percent
        )
        .dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
