use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
///
/// Authorization is a single admin/non-admin flag; there is no finer-grained RBAC.
/// Both the lowercase (`"admin"`) and uppercase (`"ADMIN"`) spellings are accepted
/// on input since both appear in stored user records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "ADMIN")]
    Admin,
    #[serde(alias = "USER")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_spellings() {
        let upper: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        let lower: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(upper, Role::Admin);
        assert_eq!(lower, Role::User);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
