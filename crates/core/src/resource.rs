use crate::error::ScaffoldError;
use crate::inflector::{pluralize_word, to_snake_case, to_studly_case};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// The artifacts produced for one resource, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Model,
    Migration,
    StoreRequest,
    UpdateRequest,
    Controller,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Model,
        ArtifactKind::Migration,
        ArtifactKind::StoreRequest,
        ArtifactKind::UpdateRequest,
        ArtifactKind::Controller,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Migration => "migration",
            ArtifactKind::StoreRequest => "store request",
            ArtifactKind::UpdateRequest => "update request",
            ArtifactKind::Controller => "controller",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A validated resource name such as `Invoice`.
///
/// Every artifact name is derived from the studly (PascalCase) form, so two
/// spellings of the same resource (`invoice_item`, `InvoiceItem`) compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ResourceName {
    studly: String,
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("identifier pattern is valid"))
}

impl ResourceName {
    pub fn parse(input: &str) -> Result<Self, ScaffoldError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScaffoldError::invalid_input("resource name must not be empty"));
        }

        let studly = to_studly_case(trimmed);
        if !identifier_pattern().is_match(&studly) {
            return Err(ScaffoldError::invalid_input(format!(
                "'{}' is not a valid class name; use letters and digits, starting with a letter",
                trimmed
            )));
        }

        Ok(Self { studly })
    }

    /// PascalCase singular, e.g. `InvoiceItem`.
    pub fn studly(&self) -> &str {
        &self.studly
    }

    /// snake_case plural, e.g. `invoice_items`.
    pub fn table(&self) -> String {
        to_snake_case(&pluralize_word(&self.studly))
    }

    /// The substring every create-table migration for this resource carries.
    pub fn migration_token(&self) -> String {
        format!("create_{}_table", self.table())
    }

    pub fn store_request(&self) -> String {
        format!("{}StoreRequest", self.studly)
    }

    pub fn update_request(&self) -> String {
        format!("{}UpdateRequest", self.studly)
    }

    pub fn controller(&self) -> String {
        format!("{}Controller", self.studly)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.studly)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.studly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_derives_all_names() {
        let name = ResourceName::parse("Invoice").unwrap();
        assert_eq!(name.studly(), "Invoice");
        assert_eq!(name.table(), "invoices");
        assert_eq!(name.migration_token(), "create_invoices_table");
        assert_eq!(name.store_request(), "InvoiceStoreRequest");
        assert_eq!(name.update_request(), "InvoiceUpdateRequest");
        assert_eq!(name.controller(), "InvoiceController");
    }

    #[test]
    fn test_parse_normalizes_spelling() {
        let a = ResourceName::parse("invoice_item").unwrap();
        let b = ResourceName::parse("  InvoiceItem ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.table(), "invoice_items");
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(matches!(ResourceName::parse(""), Err(ScaffoldError::InvalidInput(_))));
        assert!(matches!(ResourceName::parse("   "), Err(ScaffoldError::InvalidInput(_))));
        assert!(matches!(ResourceName::parse("9Lives"), Err(ScaffoldError::InvalidInput(_))));
        assert!(matches!(ResourceName::parse("Invoice/Item"), Err(ScaffoldError::InvalidInput(_))));
        assert!(matches!(ResourceName::parse("Café"), Err(ScaffoldError::InvalidInput(_))));
    }

    #[test]
    fn test_table_follows_framework_plurals() {
        let cases = [
            ("Index", "indices"),
            ("Analysis", "analyses"),
            ("Medium", "media"),
            ("Quiz", "quizzes"),
            ("Potato", "potatoes"),
            ("Cactus", "cacti"),
            ("Criterion", "criteria"),
            ("ProductCategory", "product_categories"),
            ("CompanyPerson", "company_people"),
            ("SensorData", "sensor_data"),
        ];
        for (input, table) in cases {
            let name = ResourceName::parse(input).unwrap();
            assert_eq!(name.table(), table, "table for {}", input);
        }
        assert_eq!(
            ResourceName::parse("Index").unwrap().migration_token(),
            "create_indices_table"
        );
    }
}
