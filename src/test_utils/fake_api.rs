//! An in-memory finance API served over HTTP on an ephemeral port.
//!
//! Implements the endpoints the client uses with the same validation and
//! error shapes as the real API, and records every request so tests can
//! assert how many network calls were made.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::date};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use crate::{
    budget::{Budget, BudgetId, BudgetUpdate, NewBudget},
    category::{Category, CategoryId, CategoryType, NewCategory},
    client::ApiClient,
    config::ClientConfig,
    pagination::Paginated,
    statistics::{CategoryStatistic, DateRange, MonthlyStatistic, Statistics},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionType},
};

const SEED_TIMESTAMP: &str = "2025-01-01T00:00:00Z";

/// A running fake API. The server stops when this is dropped.
pub(crate) struct FakeApi {
    addr: SocketAddr,
    state: FakeState,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl FakeApi {
    /// Start a fake API seeded with five categories and two transactions:
    ///
    /// | ID | Category | Type | Predefined |
    /// |---|---|---|---|
    /// | 1 | Salary | Income | yes |
    /// | 2 | Freelance | Income | no |
    /// | 3 | Groceries | Expense | yes |
    /// | 4 | Rent | Expense | no |
    /// | 5 | Other | Both | yes |
    ///
    /// Transaction 1 is a 5000 salary on 2025-01-01 and transaction 2 is
    /// 1200 of rent on 2025-01-02.
    pub(crate) async fn start() -> Self {
        let state = FakeState::seeded();
        let router = Router::new()
            .nest("/api", api_routes())
            .layer(middleware::from_fn_with_state(state.clone(), record_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind the fake API to a port");
        let addr = listener
            .local_addr()
            .expect("Could not get the fake API address");
        let (shutdown, shutdown_signal) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_signal.await.ok();
                })
                .await
                .expect("The fake API stopped unexpectedly");
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown),
            server: Some(server),
        }
    }

    /// The base URL of the API, e.g. `http://127.0.0.1:1234/api`.
    pub(crate) fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// A client for this API with the default config.
    pub(crate) fn client(&self) -> ApiClient {
        let config = ClientConfig::new(&self.base_url()).expect("Invalid fake API URL");

        ApiClient::new(&config).expect("Could not create client")
    }

    /// Stop accepting connections and wait for the server to finish.
    pub(crate) async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }

        if let Some(server) = self.server.take() {
            server.await.expect("The fake API panicked");
        }
    }

    /// The number of requests received for `route`, e.g. `"GET /api/categories"`.
    pub(crate) fn request_count(&self, route: &str) -> usize {
        self.state
            .lock()
            .requests
            .get(route)
            .copied()
            .unwrap_or_default()
    }

    /// The query string of the last request for `route`, if it had one.
    pub(crate) fn last_query(&self, route: &str) -> Option<String> {
        self.state.lock().last_queries.get(route).cloned().flatten()
    }

    /// Wait for `delay` before handling each request.
    pub(crate) fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = delay;
    }

    /// Respond to the next request with `status` instead of handling it.
    pub(crate) fn fail_next(&self, status: StatusCode) {
        self.state.lock().fail_next = Some(status);
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

#[derive(Clone)]
struct FakeState(Arc<Mutex<Store>>);

impl FakeState {
    fn seeded() -> Self {
        let category = |id, name: &str, category_type, is_custom| Category {
            id,
            name: name.to_owned(),
            category_type,
            is_custom,
            created_at: SEED_TIMESTAMP.to_owned(),
        };
        let categories = vec![
            category(1, "Salary", CategoryType::Income, false),
            category(2, "Freelance", CategoryType::Income, true),
            category(3, "Groceries", CategoryType::Expense, false),
            category(4, "Rent", CategoryType::Expense, true),
            category(5, "Other", CategoryType::Both, false),
        ];

        let transaction =
            |id, date: Date, description: &str, amount, transaction_type, category_id| {
                Transaction {
                    id,
                    date,
                    description: description.to_owned(),
                    amount,
                    transaction_type,
                    category_id,
                    category_name: description.to_owned(),
                    notes: None,
                    created_at: SEED_TIMESTAMP.to_owned(),
                    updated_at: None,
                }
            };
        let transactions = vec![
            transaction(1, date!(2025 - 01 - 01), "Salary", 5000.0, TransactionType::Income, 1),
            transaction(2, date!(2025 - 01 - 02), "Rent", 1200.0, TransactionType::Expense, 4),
        ];

        Self(Arc::new(Mutex::new(Store {
            categories,
            transactions,
            budgets: Vec::new(),
            next_id: 100,
            requests: HashMap::new(),
            last_queries: HashMap::new(),
            delay: Duration::ZERO,
            fail_next: None,
        })))
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.0.lock().expect("The fake API state lock was poisoned")
    }
}

struct Store {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    next_id: i64,
    requests: HashMap<String, usize>,
    last_queries: HashMap<String, Option<String>>,
    delay: Duration,
    fail_next: Option<StatusCode>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn category(&self, id: CategoryId) -> Result<&Category, FakeError> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .ok_or_else(|| FakeError::not_found(format!("Category with ID {id} not found")))
    }

    fn category_name(&self, id: CategoryId) -> String {
        self.category(id)
            .map(|category| category.name.clone())
            .unwrap_or_else(|_| "Unknown".to_owned())
    }

    fn transactions_in(&self, range: DateRange) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |transaction| range.contains(transaction.date))
    }

    /// The server-side rules for a transaction payload.
    fn check_transaction(&self, transaction: &NewTransaction) -> Result<String, FakeError> {
        let mut errors = Vec::new();

        if transaction.description.trim().is_empty() {
            errors.push("Description is required");
        } else if transaction.description.encode_utf16().count() > 200 {
            errors.push("Description must be less than 200 characters");
        }

        if transaction.amount <= 0.0 {
            errors.push("Amount must be greater than 0");
        }

        let category_name = match self.category(transaction.category_id) {
            Ok(category) if !category.category_type.accepts(transaction.transaction_type) => {
                errors.push("Category type does not match transaction type");
                None
            }
            Ok(category) => Some(category.name.clone()),
            Err(_) => {
                errors.push("Category not found");
                None
            }
        };

        match category_name {
            Some(name) if errors.is_empty() => Ok(name),
            _ => Err(FakeError::validation(errors)),
        }
    }

    fn check_category_name(&self, name: &str, id: Option<CategoryId>) -> Result<(), FakeError> {
        if name.trim().is_empty() {
            return Err(FakeError::validation(vec!["Category name is required"]));
        }

        let is_taken = self.categories.iter().any(|category| {
            Some(category.id) != id && category.name.eq_ignore_ascii_case(name.trim())
        });

        if is_taken {
            Err(FakeError::new(
                StatusCode::CONFLICT,
                format!("Category with name '{}' already exists", name.trim()),
                Vec::new(),
            ))
        } else {
            Ok(())
        }
    }
}

/// A JSON error body in the shape the real API uses.
struct FakeError {
    status: StatusCode,
    message: String,
    errors: Vec<String>,
}

impl FakeError {
    fn new(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors,
        }
    }

    fn not_found(message: String) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, Vec::new())
    }

    fn validation(errors: Vec<&str>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.into_iter().map(str::to_owned).collect(),
        )
    }
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "message": self.message,
            "errors": self.errors,
        });

        (self.status, Json(body)).into_response()
    }
}

type FakeResult<T> = Result<Json<T>, FakeError>;

fn api_routes() -> Router<FakeState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/statistics", get(overall_statistics))
        .route("/statistics/by-category", get(category_statistics))
        .route("/statistics/monthly", get(monthly_statistics))
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}

async fn record_request(State(state): State<FakeState>, request: Request, next: Next) -> Response {
    let route = format!("{} {}", request.method(), request.uri().path());
    let query = request.uri().query().map(str::to_owned);

    let (delay, fail_with) = {
        let mut store = state.lock();
        *store.requests.entry(route.clone()).or_default() += 1;
        store.last_queries.insert(route, query);
        (store.delay, store.fail_next.take())
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match fail_with {
        Some(status) => FakeError::new(status, "Injected failure", Vec::new()).into_response(),
        None => next.run(request).await,
    }
}

fn now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| SEED_TIMESTAMP.to_owned())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    page_number: Option<u64>,
    page_size: Option<u64>,
}

async fn list_transactions(
    State(state): State<FakeState>,
    Query(params): Query<PageParams>,
) -> FakeResult<Paginated<Transaction>> {
    let store = state.lock();
    let page_number = params.page_number.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(20).max(1);

    let mut transactions = store.transactions.clone();
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    let total_count = transactions.len() as u64;
    let total_pages = total_count.div_ceil(page_size);
    let data = transactions
        .into_iter()
        .skip(((page_number - 1) * page_size) as usize)
        .take(page_size as usize)
        .collect();

    Ok(Json(Paginated {
        data,
        page_number,
        page_size,
        total_count,
        total_pages,
        has_next: page_number < total_pages,
        has_previous: page_number > 1,
    }))
}

async fn get_transaction(
    State(state): State<FakeState>,
    Path(id): Path<TransactionId>,
) -> FakeResult<Transaction> {
    state
        .lock()
        .transactions
        .iter()
        .find(|transaction| transaction.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| FakeError::not_found(format!("Transaction with ID {id} not found")))
}

async fn create_transaction(
    State(state): State<FakeState>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), FakeError> {
    let mut store = state.lock();
    let category_name = store.check_transaction(&new_transaction)?;

    let transaction = Transaction {
        id: store.next_id(),
        date: new_transaction.date,
        description: new_transaction.description.trim().to_owned(),
        amount: new_transaction.amount,
        transaction_type: new_transaction.transaction_type,
        category_id: new_transaction.category_id,
        category_name,
        notes: new_transaction.notes,
        created_at: now(),
        updated_at: None,
    };
    store.transactions.push(transaction.clone());

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn update_transaction(
    State(state): State<FakeState>,
    Path(id): Path<TransactionId>,
    Json(update): Json<NewTransaction>,
) -> FakeResult<Transaction> {
    let mut store = state.lock();
    let category_name = store.check_transaction(&update)?;

    let transaction = store
        .transactions
        .iter_mut()
        .find(|transaction| transaction.id == id)
        .ok_or_else(|| FakeError::not_found(format!("Transaction with ID {id} not found")))?;

    transaction.date = update.date;
    transaction.description = update.description.trim().to_owned();
    transaction.amount = update.amount;
    transaction.transaction_type = update.transaction_type;
    transaction.category_id = update.category_id;
    transaction.category_name = category_name;
    transaction.notes = update.notes;
    transaction.updated_at = Some(now());

    Ok(Json(transaction.clone()))
}

async fn delete_transaction(
    State(state): State<FakeState>,
    Path(id): Path<TransactionId>,
) -> Result<StatusCode, FakeError> {
    let mut store = state.lock();
    let count = store.transactions.len();
    store.transactions.retain(|transaction| transaction.id != id);

    if store.transactions.len() == count {
        Err(FakeError::not_found(format!("Transaction with ID {id} not found")))
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

async fn list_categories(State(state): State<FakeState>) -> FakeResult<Vec<Category>> {
    Ok(Json(state.lock().categories.clone()))
}

async fn get_category(
    State(state): State<FakeState>,
    Path(id): Path<CategoryId>,
) -> FakeResult<Category> {
    state.lock().category(id).cloned().map(Json)
}

async fn create_category(
    State(state): State<FakeState>,
    Json(new_category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), FakeError> {
    let mut store = state.lock();
    store.check_category_name(&new_category.name, None)?;

    let category = Category {
        id: store.next_id(),
        name: new_category.name.trim().to_owned(),
        category_type: new_category.category_type,
        is_custom: true,
        created_at: now(),
    };
    store.categories.push(category.clone());

    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<FakeState>,
    Path(id): Path<CategoryId>,
    Json(update): Json<NewCategory>,
) -> FakeResult<Category> {
    let mut store = state.lock();

    if store.category(id)?.is_predefined() {
        return Err(FakeError::new(
            StatusCode::BAD_REQUEST,
            "Cannot modify predefined categories",
            Vec::new(),
        ));
    }
    store.check_category_name(&update.name, Some(id))?;

    let name = update.name.trim().to_owned();
    for transaction in store
        .transactions
        .iter_mut()
        .filter(|transaction| transaction.category_id == id)
    {
        transaction.category_name = name.clone();
    }

    let category = store
        .categories
        .iter_mut()
        .find(|category| category.id == id)
        .ok_or_else(|| FakeError::not_found(format!("Category with ID {id} not found")))?;
    category.name = name;
    category.category_type = update.category_type;

    Ok(Json(category.clone()))
}

async fn delete_category(
    State(state): State<FakeState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, FakeError> {
    let mut store = state.lock();

    if store.category(id)?.is_predefined() {
        return Err(FakeError::new(
            StatusCode::BAD_REQUEST,
            "Cannot delete predefined categories",
            Vec::new(),
        ));
    }

    if store
        .transactions
        .iter()
        .any(|transaction| transaction.category_id == id)
    {
        return Err(FakeError::new(
            StatusCode::CONFLICT,
            "Cannot delete category that is used by transactions",
            Vec::new(),
        ));
    }

    store.categories.retain(|category| category.id != id);

    Ok(StatusCode::NO_CONTENT)
}

async fn overall_statistics(
    State(state): State<FakeState>,
    Query(range): Query<DateRange>,
) -> FakeResult<Statistics> {
    let store = state.lock();
    let mut statistics = Statistics {
        total_income: 0.0,
        total_expenses: 0.0,
        balance: 0.0,
        transaction_count: 0,
    };

    for transaction in store.transactions_in(range) {
        match transaction.transaction_type {
            TransactionType::Income => statistics.total_income += transaction.amount,
            TransactionType::Expense => statistics.total_expenses += transaction.amount,
        }
        statistics.transaction_count += 1;
    }
    statistics.balance = statistics.total_income - statistics.total_expenses;

    Ok(Json(statistics))
}

async fn category_statistics(
    State(state): State<FakeState>,
    Query(range): Query<DateRange>,
) -> FakeResult<Vec<CategoryStatistic>> {
    let store = state.lock();
    let mut statistics: Vec<CategoryStatistic> = Vec::new();

    for transaction in store.transactions_in(range) {
        match statistics
            .iter_mut()
            .find(|statistic| statistic.category_id == transaction.category_id)
        {
            Some(statistic) => {
                statistic.total_amount += transaction.amount;
                statistic.transaction_count += 1;
            }
            None => statistics.push(CategoryStatistic {
                category_id: transaction.category_id,
                category_name: store.category_name(transaction.category_id),
                transaction_type: transaction.transaction_type,
                total_amount: transaction.amount,
                transaction_count: 1,
            }),
        }
    }
    statistics.sort_by_key(|statistic| statistic.category_id);

    Ok(Json(statistics))
}

#[derive(Deserialize)]
struct YearParams {
    year: Option<i32>,
}

async fn monthly_statistics(
    State(state): State<FakeState>,
    Query(params): Query<YearParams>,
) -> FakeResult<Vec<MonthlyStatistic>> {
    let store = state.lock();
    let mut months: Vec<MonthlyStatistic> = Vec::new();

    for transaction in store
        .transactions
        .iter()
        .filter(|transaction| params.year.is_none_or(|year| transaction.date.year() == year))
    {
        let (year, month) = (transaction.date.year(), transaction.date.month());
        let index = match months
            .iter()
            .position(|statistic| statistic.year == year && statistic.month == u8::from(month))
        {
            Some(index) => index,
            None => {
                months.push(MonthlyStatistic {
                    year,
                    month: u8::from(month),
                    month_name: month.to_string(),
                    total_income: 0.0,
                    total_expenses: 0.0,
                    balance: 0.0,
                    transaction_count: 0,
                });
                months.len() - 1
            }
        };

        let statistic = &mut months[index];
        match transaction.transaction_type {
            TransactionType::Income => statistic.total_income += transaction.amount,
            TransactionType::Expense => statistic.total_expenses += transaction.amount,
        }
        statistic.balance = statistic.total_income - statistic.total_expenses;
        statistic.transaction_count += 1;
    }
    months.sort_by_key(|statistic| (statistic.year, statistic.month));

    Ok(Json(months))
}

fn budget_not_found(id: BudgetId) -> FakeError {
    FakeError::not_found(format!("Budget with ID {id} not found"))
}

async fn list_budgets(State(state): State<FakeState>) -> FakeResult<Vec<Budget>> {
    Ok(Json(state.lock().budgets.clone()))
}

async fn get_budget(State(state): State<FakeState>, Path(id): Path<BudgetId>) -> FakeResult<Budget> {
    state
        .lock()
        .budgets
        .iter()
        .find(|budget| budget.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| budget_not_found(id))
}

async fn create_budget(
    State(state): State<FakeState>,
    Json(new_budget): Json<NewBudget>,
) -> Result<(StatusCode, Json<Budget>), FakeError> {
    let mut store = state.lock();

    let mut errors = Vec::new();
    if new_budget.name.trim().is_empty() {
        errors.push("Budget name is required");
    }
    if new_budget.amount <= 0.0 {
        errors.push("Amount must be greater than 0");
    }
    if new_budget.start_date > new_budget.end_date {
        errors.push("Start date must be before or equal to end date");
    }
    if store.category(new_budget.category_id).is_err() {
        errors.push("Category not found");
    }
    if !errors.is_empty() {
        return Err(FakeError::validation(errors));
    }

    let budget = Budget {
        id: store.next_id(),
        name: new_budget.name.trim().to_owned(),
        amount: new_budget.amount,
        start_date: new_budget.start_date,
        end_date: new_budget.end_date,
        category_id: new_budget.category_id,
        created_at: now(),
        updated_at: None,
    };
    store.budgets.push(budget.clone());

    Ok((StatusCode::CREATED, Json(budget)))
}

async fn update_budget(
    State(state): State<FakeState>,
    Path(id): Path<BudgetId>,
    Json(update): Json<BudgetUpdate>,
) -> FakeResult<Budget> {
    let mut store = state.lock();
    let budget = store
        .budgets
        .iter_mut()
        .find(|budget| budget.id == id)
        .ok_or_else(|| budget_not_found(id))?;

    if let Some(name) = update.name {
        budget.name = name;
    }
    if let Some(amount) = update.amount {
        budget.amount = amount;
    }
    if let Some(start_date) = update.start_date {
        budget.start_date = start_date;
    }
    if let Some(end_date) = update.end_date {
        budget.end_date = end_date;
    }
    if let Some(category_id) = update.category_id {
        budget.category_id = category_id;
    }
    budget.updated_at = Some(now());

    Ok(Json(budget.clone()))
}

async fn delete_budget(
    State(state): State<FakeState>,
    Path(id): Path<BudgetId>,
) -> Result<StatusCode, FakeError> {
    let mut store = state.lock();
    let count = store.budgets.len();
    store.budgets.retain(|budget| budget.id != id);

    if store.budgets.len() == count {
        Err(budget_not_found(id))
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}
