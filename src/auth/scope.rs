/// Proof that the caller authenticated as a member of an account.
///
/// Every query against account-owned rows takes one of these. It can only be
/// minted from a resolved [`CurrentUser`](super::CurrentUser), so a handler
/// cannot address another tenant's data by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountScope {
    account_id: i64,
}

impl AccountScope {
    pub(super) fn new(account_id: i64) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> i64 {
        self.account_id
    }
}
