use std::{process::ExitCode, time::Duration};

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack::{
    API_URL_ENV, Budget, BudgetForm, Category, CategoryForm, CategoryId, ClientConfig,
    DEFAULT_API_URL, DEFAULT_TIMEZONE, DateRange, DateRangeForm, Error, FinanceApi, PageRequest,
    TIMEOUT_ENV, TIMEZONE_ENV, Transaction, TransactionForm, TransactionType, ValidationErrors,
    format_amount_with_sign, format_currency, format_date, selectable_categories, today_in,
};

/// A command line client for the fintrack personal finance API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the finance API.
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// The canonical timezone name used to work out today's date, e.g. "Pacific/Auckland".
    #[arg(long, env = TIMEZONE_ENV, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Give up on a request after this many seconds.
    #[arg(long, env = TIMEOUT_ENV)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List, add, edit and delete transactions.
    #[command(subcommand)]
    Transactions(TransactionCommand),

    /// List, add, edit and delete categories.
    #[command(subcommand)]
    Categories(CategoryCommand),

    /// List, add and delete budgets.
    #[command(subcommand)]
    Budgets(BudgetCommand),

    /// Show income and expense totals.
    #[command(subcommand)]
    Stats(StatsCommand),
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    /// List transactions, newest first.
    List {
        /// The page to show.
        #[arg(long)]
        page: Option<u64>,
        /// How many transactions to show per page.
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Show a single transaction.
    Show { id: i64 },
    /// Record a new transaction.
    Add(NewTransactionArgs),
    /// Change an existing transaction, fields that are not given keep their value.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TransactionFields,
    },
    /// Delete a transaction.
    Delete { id: i64 },
}

#[derive(ClapArgs, Debug)]
struct NewTransactionArgs {
    /// The date as YYYY-MM-DD, defaults to today.
    #[arg(long)]
    date: Option<String>,
    /// What the transaction was for.
    #[arg(long)]
    description: String,
    /// The amount, always positive.
    #[arg(long)]
    amount: String,
    /// "income" or "expense".
    #[arg(long = "type", default_value = "expense")]
    transaction_type: String,
    /// The ID of the category.
    #[arg(long)]
    category: String,
    /// Optional notes.
    #[arg(long)]
    notes: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct TransactionFields {
    /// The date as YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,
    /// What the transaction was for.
    #[arg(long)]
    description: Option<String>,
    /// The amount, always positive.
    #[arg(long)]
    amount: Option<String>,
    /// "income" or "expense".
    #[arg(long = "type")]
    transaction_type: Option<String>,
    /// The ID of the category.
    #[arg(long)]
    category: Option<String>,
    /// Notes, an empty string removes them.
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List every category.
    List {
        /// Only show categories that can be used for this transaction type.
        #[arg(long = "for")]
        transaction_type: Option<TransactionType>,
    },
    /// Show a single category.
    Show { id: CategoryId },
    /// Create a custom category.
    Add {
        /// The display name.
        #[arg(long)]
        name: String,
        /// "income", "expense" or "both".
        #[arg(long = "type")]
        category_type: String,
    },
    /// Rename or retype a custom category.
    Edit {
        id: CategoryId,
        /// The new display name.
        #[arg(long)]
        name: Option<String>,
        /// "income", "expense" or "both".
        #[arg(long = "type")]
        category_type: Option<String>,
    },
    /// Delete a custom category that no transaction uses.
    Delete { id: CategoryId },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// List every budget.
    List,
    /// Show a single budget.
    Show { id: i64 },
    /// Create a budget.
    Add {
        /// The display name.
        #[arg(long)]
        name: String,
        /// The most that should be spent.
        #[arg(long)]
        amount: String,
        /// The first day as YYYY-MM-DD.
        #[arg(long)]
        start: String,
        /// The last day as YYYY-MM-DD.
        #[arg(long)]
        end: String,
        /// The ID of the category.
        #[arg(long)]
        category: String,
    },
    /// Delete a budget.
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum StatsCommand {
    /// Totals over a date range.
    Overall(RangeArgs),
    /// Totals per category over a date range.
    ByCategory(RangeArgs),
    /// Totals per month of a year.
    Monthly {
        /// The year, defaults to the server's choice.
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(ClapArgs, Debug)]
struct RangeArgs {
    /// The first date to include, as YYYY-MM-DD.
    #[arg(long)]
    start: Option<String>,
    /// The last date to include, as YYYY-MM-DD.
    #[arg(long)]
    end: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fintrack=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Args) -> Result<(), Error> {
    let config = ClientConfig::new(&args.api_url)?
        .with_timezone(&args.timezone)?
        .with_timeout(args.timeout_secs.map(Duration::from_secs));
    let api = FinanceApi::new(&config)?;

    match args.command {
        Command::Transactions(command) => run_transaction_command(&api, command).await,
        Command::Categories(command) => run_category_command(&api, command).await,
        Command::Budgets(command) => run_budget_command(&api, command).await,
        Command::Stats(command) => run_stats_command(&api, command).await,
    }
}

async fn run_transaction_command(api: &FinanceApi, command: TransactionCommand) -> Result<(), Error> {
    let today = today_in(&api.config().timezone)?;

    match command {
        TransactionCommand::List { page, page_size } => {
            let pagination = &api.config().pagination;
            let mut request = pagination.page(page);
            if let Some(page_size) = page_size {
                request = PageRequest::new(request.page_number, page_size.max(1));
            }

            let page = api.transactions().transactions(request).await?;
            if page.data.is_empty() {
                println!("No transactions.");
            }
            for transaction in &page.data {
                print_transaction_row(transaction);
            }

            let indicators = page
                .indicators(pagination.max_pages)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            if !indicators.is_empty() {
                println!();
                println!("Page {}", indicators.join(" "));
            }
        }
        TransactionCommand::Show { id } => {
            let transaction = api.transactions().transaction(id).await?;
            print_transaction(&transaction);
        }
        TransactionCommand::Add(fields) => {
            let form = TransactionForm {
                date: fields.date.unwrap_or_else(|| today.to_string()),
                description: fields.description,
                amount: fields.amount,
                transaction_type: fields.transaction_type,
                category_id: fields.category,
                notes: fields.notes.unwrap_or_default(),
            };
            let new_transaction = form.validate(today)?;
            check_category(api, new_transaction.category_id, new_transaction.transaction_type)
                .await?;

            let transaction = api.transactions().create(&new_transaction).await?;
            println!("Added transaction {}", transaction.id);
            print_transaction(&transaction);
        }
        TransactionCommand::Edit { id, fields } => {
            let current = api.transactions().transaction(id).await?;
            let mut form = TransactionForm::from(current.as_ref());
            if let Some(date) = fields.date {
                form.date = date;
            }
            if let Some(description) = fields.description {
                form.description = description;
            }
            if let Some(amount) = fields.amount {
                form.amount = amount;
            }
            if let Some(transaction_type) = fields.transaction_type {
                form.transaction_type = transaction_type;
            }
            if let Some(category) = fields.category {
                form.category_id = category;
            }
            if let Some(notes) = fields.notes {
                form.notes = notes;
            }

            let update = form.validate(today)?;
            check_category(api, update.category_id, update.transaction_type).await?;

            let transaction = api.transactions().update(id, &update).await?;
            println!("Updated transaction {id}");
            print_transaction(&transaction);
        }
        TransactionCommand::Delete { id } => {
            api.transactions().delete(id).await?;
            println!("Deleted transaction {id}");
        }
    }

    Ok(())
}

/// Reject a category that does not exist or cannot be used for
/// `transaction_type` before sending the transaction.
async fn check_category(
    api: &FinanceApi,
    category_id: CategoryId,
    transaction_type: TransactionType,
) -> Result<(), Error> {
    let categories = api.categories().categories().await?;

    if selectable_categories(&categories, transaction_type)
        .iter()
        .any(|category| category.id == category_id)
    {
        return Ok(());
    }

    let mut errors = ValidationErrors::new();
    errors.add(
        "categoryId",
        format!(
            "Category {category_id} cannot be used for {} transactions",
            transaction_type.to_string().to_lowercase()
        ),
    );

    Err(Error::Validation(errors))
}

async fn run_category_command(api: &FinanceApi, command: CategoryCommand) -> Result<(), Error> {
    match command {
        CategoryCommand::List { transaction_type } => {
            let categories = api.categories().categories().await?;
            let shown = match transaction_type {
                Some(transaction_type) => selectable_categories(&categories, transaction_type),
                None => categories.iter().collect(),
            };

            if shown.is_empty() {
                println!("No categories.");
            }
            for category in shown {
                print_category_row(category);
            }
        }
        CategoryCommand::Show { id } => {
            let category = api.categories().category(id).await?;
            print_category_row(&category);
        }
        CategoryCommand::Add {
            name,
            category_type,
        } => {
            let new_category = CategoryForm {
                name,
                category_type,
            }
            .validate()?;

            let category = api.categories().create(&new_category).await?;
            println!("Added category {}", category.id);
            print_category_row(&category);
        }
        CategoryCommand::Edit {
            id,
            name,
            category_type,
        } => {
            let current = api.categories().category(id).await?;
            current.ensure_custom()?;

            let update = CategoryForm {
                name: name.unwrap_or_else(|| current.name.clone()),
                category_type: category_type.unwrap_or_else(|| current.category_type.to_string()),
            }
            .validate()?;

            let category = api.categories().update(id, &update).await?;
            println!("Updated category {id}");
            print_category_row(&category);
        }
        CategoryCommand::Delete { id } => {
            api.categories().category(id).await?.ensure_custom()?;
            api.categories().delete(id).await?;
            println!("Deleted category {id}");
        }
    }

    Ok(())
}

async fn run_budget_command(api: &FinanceApi, command: BudgetCommand) -> Result<(), Error> {
    match command {
        BudgetCommand::List => {
            let budgets = api.budgets().budgets().await?;
            if budgets.is_empty() {
                println!("No budgets.");
            }
            for budget in budgets.iter() {
                print_budget_row(budget);
            }
        }
        BudgetCommand::Show { id } => {
            let budget = api.budgets().budget(id).await?;
            print_budget_row(&budget);
        }
        BudgetCommand::Add {
            name,
            amount,
            start,
            end,
            category,
        } => {
            let new_budget = BudgetForm {
                name,
                amount,
                start_date: start,
                end_date: end,
                category_id: category,
            }
            .validate()?;

            let budget = api.budgets().create(&new_budget).await?;
            println!("Added budget {}", budget.id);
            print_budget_row(&budget);
        }
        BudgetCommand::Delete { id } => {
            api.budgets().delete(id).await?;
            println!("Deleted budget {id}");
        }
    }

    Ok(())
}

async fn run_stats_command(api: &FinanceApi, command: StatsCommand) -> Result<(), Error> {
    match command {
        StatsCommand::Overall(range) => {
            let statistics = api.statistics().overall(parse_range(range)?).await?;

            println!("Income:       {:>14}", format_currency(statistics.total_income));
            println!("Expenses:     {:>14}", format_currency(statistics.total_expenses));
            println!("Balance:      {:>14}", format_currency(statistics.balance));
            println!("Transactions: {:>14}", statistics.transaction_count);
        }
        StatsCommand::ByCategory(range) => {
            let statistics = api.statistics().by_category(parse_range(range)?).await?;
            if statistics.is_empty() {
                println!("No transactions in this range.");
            }

            for statistic in statistics.iter() {
                println!(
                    "{:<24} {:>15} {:>5} transactions",
                    statistic.category_name,
                    format_amount_with_sign(statistic.total_amount, statistic.transaction_type),
                    statistic.transaction_count
                );
            }
        }
        StatsCommand::Monthly { year } => {
            let months = api.statistics().monthly(year).await?;
            if months.is_empty() {
                println!("No transactions in this year.");
            }

            for month in months.iter() {
                println!(
                    "{:<10} {:>5} {:>15} {:>15} {:>15}",
                    month.month_name,
                    month.year,
                    format_currency(month.total_income),
                    format_currency(month.total_expenses),
                    format_currency(month.balance)
                );
            }
        }
    }

    Ok(())
}

fn parse_range(range: RangeArgs) -> Result<DateRange, Error> {
    let form = DateRangeForm {
        start_date: range.start.unwrap_or_default(),
        end_date: range.end.unwrap_or_default(),
    };

    Ok(form.validate()?)
}

fn print_transaction_row(transaction: &Transaction) {
    println!(
        "{:>6}  {}  {:<32} {:<16} {:>15}",
        transaction.id,
        format_date(transaction.date),
        transaction.description,
        transaction.category_name,
        format_amount_with_sign(transaction.amount, transaction.transaction_type)
    );
}

fn print_transaction(transaction: &Transaction) {
    println!("ID:          {}", transaction.id);
    println!("Date:        {}", format_date(transaction.date));
    println!("Description: {}", transaction.description);
    println!(
        "Amount:      {}",
        format_amount_with_sign(transaction.amount, transaction.transaction_type)
    );
    println!("Type:        {}", transaction.transaction_type);
    println!(
        "Category:    {} ({})",
        transaction.category_name, transaction.category_id
    );
    if let Some(notes) = &transaction.notes {
        println!("Notes:       {notes}");
    }
}

fn print_category_row(category: &Category) {
    println!(
        "{:>6}  {:<24} {:<8} {}",
        category.id,
        category.name,
        category.category_type,
        if category.is_predefined() {
            "predefined"
        } else {
            "custom"
        }
    );
}

fn print_budget_row(budget: &Budget) {
    println!(
        "{:>6}  {:<24} {:>15}  {} to {}  category {}",
        budget.id,
        budget.name,
        format_currency(budget.amount),
        format_date(budget.start_date),
        format_date(budget.end_date),
        budget.category_id
    );
}

fn print_error(error: &Error) {
    match error {
        Error::Validation(errors) => {
            eprintln!("Error: invalid input");
            for field_error in errors.iter() {
                eprintln!("  {}: {}", field_error.field, field_error.message);
            }
        }
        Error::Api(api_error) => {
            eprintln!("Error: {} (status {})", api_error.message, api_error.status);
            for message in &api_error.errors {
                eprintln!("  {message}");
            }
        }
        error => eprintln!("Error: {error}"),
    }
}
