use crate::{
    category::{CategoryType, NewCategory},
    validation::{ValidationErrors, required_text},
};

/// The longest category name the API accepts.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// The category form as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    /// The display name.
    pub name: String,
    /// "income", "expense" or "both".
    pub category_type: String,
}

impl CategoryForm {
    /// Check every field and build the payload to send to the API.
    ///
    /// # Errors
    ///
    /// Returns the [ValidationErrors] for every invalid field.
    pub fn validate(&self) -> Result<NewCategory, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(
            &mut errors,
            "name",
            &self.name,
            MAX_CATEGORY_NAME_LENGTH,
            "Category name is required",
            "Category name must be less than 100 characters",
        );

        if !name.chars().all(is_name_char) {
            errors.add(
                "name",
                "Category name can only contain letters, numbers, spaces, hyphens, and underscores",
            );
        }

        let category_type = self.category_type.parse::<CategoryType>();
        if category_type.is_err() {
            errors.add("type", "Invalid category type");
        }

        match category_type {
            Ok(category_type) => errors.into_result(|| NewCategory {
                name,
                category_type,
            }),
            Err(_) => Err(errors),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_')
}
