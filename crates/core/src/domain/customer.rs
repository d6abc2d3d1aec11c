use serde::{Deserialize, Serialize};

/// Salutations offered by the quote form.
pub const SALUTATIONS: &[&str] = &["Mr.", "Mrs.", "Ms.", "Dr.", "Prof."];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub salutation: Option<String>,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
}

impl CustomerInfo {
    /// Display name for documents, salutation included when present.
    pub fn display_name(&self) -> String {
        match &self.salutation {
            Some(salutation) if !salutation.is_empty() => {
                format!("{salutation} {}", self.name)
            }
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CustomerInfo;

    #[test]
    fn display_name_includes_salutation_when_present() {
        let customer = CustomerInfo {
            salutation: Some("Dr.".to_string()),
            name: "Avery Chen".to_string(),
            company: "Northwind".to_string(),
            email: "avery@northwind.example".to_string(),
        };
        assert_eq!(customer.display_name(), "Dr. Avery Chen");

        let plain = CustomerInfo { name: "Avery Chen".to_string(), ..Default::default() };
        assert_eq!(plain.display_name(), "Avery Chen");
    }
}
