use crate::{
    budget::NewBudget,
    validation::{ValidationErrors, amount, positive_id, required_date, required_text},
};

/// The longest budget name the API accepts.
pub const MAX_BUDGET_NAME_LENGTH: usize = 100;

/// The budget form as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetForm {
    /// The display name.
    pub name: String,
    /// The limit, e.g. "400".
    pub amount: String,
    /// The first day as `YYYY-MM-DD`.
    pub start_date: String,
    /// The last day as `YYYY-MM-DD`.
    pub end_date: String,
    /// The ID of the category the budget applies to.
    pub category_id: String,
}

impl BudgetForm {
    /// Check every field and build the payload to send to the API.
    ///
    /// # Errors
    ///
    /// Returns the [ValidationErrors] for every invalid field.
    pub fn validate(&self) -> Result<NewBudget, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(
            &mut errors,
            "name",
            &self.name,
            MAX_BUDGET_NAME_LENGTH,
            "Budget name is required",
            "Budget name must be less than 100 characters",
        );
        let amount = amount(&mut errors, "amount", &self.amount);
        let start_date =
            required_date(&mut errors, "startDate", &self.start_date, "Start date is required");
        let end_date = required_date(&mut errors, "endDate", &self.end_date, "End date is required");
        let category_id = positive_id(
            &mut errors,
            "categoryId",
            &self.category_id,
            "Category is required",
        );

        if let (Some(start), Some(end)) = (start_date, end_date)
            && start > end
        {
            errors.add("endDate", "Start date must be before or equal to end date");
        }

        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) => errors.into_result(|| NewBudget {
                name,
                amount,
                start_date,
                end_date,
                category_id,
            }),
            _ => Err(errors),
        }
    }
}
