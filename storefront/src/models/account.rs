use serde::{Deserialize, Serialize};

/// Login and password pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name, usually an e-mail address
    pub login: String,

    /// Plain password; never logged
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The customer account a user belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer number
    pub customer_no: String,

    /// `PrivateCustomer` or `SMBCustomer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<String>,

    /// Company name of business customers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Whether the customer is a business (B2B) customer
    #[serde(default)]
    pub is_business_customer: bool,
}

/// A person logged in on behalf of a customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login name
    #[serde(default)]
    pub login: String,

    /// Salutation title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// E-mail address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_home: Option<String>,

    /// Business partner number of business users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_partner_no: Option<String>,
}

/// Body of a customer registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// The customer to create
    pub customer: Customer,

    /// Its first user
    pub user: User,

    /// Credentials of that user; used to log in once registered
    pub credentials: Credentials,
}

/// Body of a password change
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// New password
    pub password: String,

    /// Password being replaced
    pub current_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_customer_wire_format() {
        let customer: Customer = serde_json::from_str(
            r#"{"customerNo":"OilCorp","customerType":"SMBCustomer","isBusinessCustomer":true}"#,
        )
        .unwrap();

        assert_eq!(customer.customer_no, "OilCorp");
        assert!(customer.is_business_customer);
        assert_eq!(customer.company_name, None);
    }

    #[test]
    fn test_credentials_are_redacted() {
        let credentials = Credentials::new("patricia@test.intershop.de", "!InterShop00!");
        let printed = format!("{credentials:?}");

        assert!(printed.contains("patricia"));
        assert!(!printed.contains("InterShop00"));
    }
}
