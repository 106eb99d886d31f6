//! Lookup and update options for account rows

use crate::domain::Balance;

/// Criteria for fetching one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountQuery {
    pub account_id: i64,
    /// When true, the read takes an exclusive row lock held until the
    /// surrounding unit of work ends
    pub for_update: bool,
}

impl AccountQuery {
    pub fn by_id(account_id: i64) -> Self {
        Self {
            account_id,
            for_update: false,
        }
    }

    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }
}

/// Fields to change on an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountUpdate {
    pub new_balance: Balance,
}

impl AccountUpdate {
    pub fn balance(new_balance: Balance) -> Self {
        Self { new_balance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = AccountQuery::by_id(33333333333333);
        assert!(!query.for_update);

        let locked = query.for_update();
        assert_eq!(locked.account_id, 33333333333333);
        assert!(locked.for_update);
    }
}
