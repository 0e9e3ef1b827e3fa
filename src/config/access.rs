use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InvoiceError, Result};

/// Module roles granted to a user account. Stored as their numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Role {
    #[serde(rename = "1", alias = "create_order")]
    CreateOrder,
    #[serde(rename = "2", alias = "account")]
    Account,
    #[serde(rename = "3", alias = "config")]
    Config,
    #[serde(rename = "4", alias = "stock_search")]
    StockSearch,
    #[serde(rename = "5", alias = "reports")]
    Reports,
}

/// Features of this tool that sit behind a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    InvoiceReport,
    OutstandingReport,
    Payment,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Feature::InvoiceReport => "the invoice report",
            Feature::OutstandingReport => "the outstanding report",
            Feature::Payment => "payments",
        })
    }
}

impl Role {
    fn grants(self, feature: Feature) -> bool {
        match self {
            Role::Account => matches!(
                feature,
                Feature::InvoiceReport | Feature::OutstandingReport | Feature::Payment
            ),
            Role::CreateOrder | Role::Config | Role::StockSearch | Role::Reports => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Access {
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Access {
    pub fn allows(&self, feature: Feature) -> bool {
        self.roles.iter().any(|role| role.grants(feature))
    }

    pub fn require(&self, feature: Feature) -> Result<()> {
        if self.allows(feature) {
            Ok(())
        } else {
            Err(InvoiceError::AccessDenied(feature.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_role_unlocks_invoices() {
        let access = Access { roles: vec![Role::Account] };
        assert!(access.require(Feature::InvoiceReport).is_ok());
        assert!(access.require(Feature::Payment).is_ok());
    }

    #[test]
    fn test_other_roles_are_denied() {
        let access = Access {
            roles: vec![Role::CreateOrder, Role::StockSearch, Role::Reports],
        };
        assert!(matches!(
            access.require(Feature::OutstandingReport),
            Err(InvoiceError::AccessDenied(_))
        ));
        assert!(!Access::default().allows(Feature::InvoiceReport));
    }

    #[test]
    fn test_roles_parse_from_codes_and_names() {
        let access: Access = toml::from_str(r#"roles = ["2", "reports"]"#).unwrap();
        assert_eq!(access.roles, vec![Role::Account, Role::Reports]);
    }
}
