//! Read-only company data store
//!
//! The dataset is compiled into the binary. [`DataStore::load`] builds it
//! once at startup and the resulting store is shared by reference; nothing
//! mutates it afterwards.

use super::record::CompanyRecord;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors that can occur while loading or querying company hierarchies
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Company '{0}' not found.")]
    CompanyNotFound(String),

    #[error("Invalid record for company '{company}': {reason}")]
    InvalidRecord { company: String, reason: String },

    #[error("Company '{0}' is registered more than once")]
    DuplicateCompany(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Immutable table of company records, in registration order
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    records: IndexMap<String, CompanyRecord>,
}

impl DataStore {
    /// Build a store from already validated records
    pub fn from_records(records: impl IntoIterator<Item = CompanyRecord>) -> GraphResult<Self> {
        let mut table = IndexMap::new();
        for record in records {
            let key = record.key().to_string();
            if table.insert(key.clone(), record).is_some() {
                return Err(GraphError::DuplicateCompany(key));
            }
        }
        Ok(DataStore { records: table })
    }

    /// Build the compiled-in dataset
    pub fn load() -> GraphResult<Self> {
        Self::from_records(builtin_records()?)
    }

    pub fn get(&self, company: &str) -> GraphResult<&CompanyRecord> {
        self.records
            .get(company)
            .ok_or_else(|| GraphError::CompanyNotFound(company.to_string()))
    }

    pub fn contains(&self, company: &str) -> bool {
        self.records.contains_key(company)
    }

    pub fn company_keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|k| k.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn builtin_records() -> GraphResult<Vec<CompanyRecord>> {
    let amalfi = CompanyRecord::builder("Amalfi midco Ltd 14185820")
        .entity("Amalfi Cleanco Ltd 14185950")
        .entity("Amalfi Bidco Ltd 14186033")
        .entity("Caretech holding Plc 04457287")
        .entity("Cambian Group Plc 08929371")
        .entity("Cambian Group Holdings Ltd 08929407")
        .entity("Caretech Comms Services Ltd 02804415")
        .edge("Amalfi midco Ltd 14185820", "Amalfi Cleanco Ltd 14185950")
        .edge("Amalfi Cleanco Ltd 14185950", "Amalfi Bidco Ltd 14186033")
        .edge("Amalfi Cleanco Ltd 14185950", "Caretech holding Plc 04457287")
        .edge("Amalfi Cleanco Ltd 14185950", "Cambian Group Plc 08929371")
        .edge("Amalfi Cleanco Ltd 14185950", "Cambian Group Holdings Ltd 08929407")
        .edge("Amalfi Cleanco Ltd 14185950", "Caretech Comms Services Ltd 02804415")
        .category(
            "new_company",
            &[
                "Amalfi Bidco Ltd 14186033",
                "Cambian Group Plc 08929371",
                "Cambian Group Holdings Ltd 08929407",
            ],
        )
        .category(
            "update",
            &[
                "Cambian Group Holdings Ltd 08929407",
                "Caretech Comms Services Ltd 02804415",
                "Caretech holding Plc 04457287",
            ],
        )
        .stats(7, 2, 2)
        .description("Amalfi midco Ltd 14185820 specializes care homes located all over the UK.")
        .build()?;

    let company_b = CompanyRecord::builder("CompanyB1234")
        .structural("Category1234")
        .structural("Category5678")
        .entity("CompanyB2")
        .entity("CompanyB3")
        .entity("CompanyB4")
        .entity("CompanyB5")
        .entity("CompanyB6")
        .entity("CompanyB7")
        .edge("CompanyB1234", "Category1234")
        .edge("CompanyB1234", "Category5678")
        .edge("Category1234", "CompanyB2")
        .edge("Category1234", "CompanyB3")
        .edge("Category5678", "CompanyB4")
        .edge("Category5678", "CompanyB5")
        .edge("Category5678", "CompanyB6")
        .edge("Category5678", "CompanyB7")
        .category("new_company", &["CompanyB2"])
        .category("update", &["CompanyB5"])
        .stats(3, 1, 2)
        .description("CompanyB1234 is known for its wide range of care services.")
        .build()?;

    let company_c = CompanyRecord::builder("CompanyC789")
        .structural("Category C123")
        .entity("Company C1")
        .entity("Company C2")
        .edge("CompanyC789", "Category C123")
        .edge("Category C123", "Company C1")
        .edge("Category C123", "Company C2")
        .category("new_company", &["Company C1"])
        .category("update", &["Company C2"])
        .stats(4, 6, 3)
        .description("CompanyC789 is a highly professional company")
        .build()?;

    let company_d = CompanyRecord::builder("CompanyD012")
        .structural("Category D969")
        .structural("Category D789")
        .entity("Company D100")
        .entity("Company D200")
        .entity("Company D300")
        .entity("Company D400")
        .entity("Company D500")
        .edge("CompanyD012", "Category D789")
        .edge("CompanyD012", "Category D969")
        .edge("Category D789", "Company D100")
        .edge("Category D789", "Company D300")
        .edge("Category D969", "Company D200")
        .edge("Category D969", "Company D400")
        .edge("Category D969", "Company D500")
        .category("new_company", &["Company D300"])
        .category("update", &["Company D500"])
        .stats(9, 6, 9)
        .description("CompanyD012 has additional related companies.")
        .build()?;

    Ok(vec![amalfi, company_b, company_c, company_d])
}
