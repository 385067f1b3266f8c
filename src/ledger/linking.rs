use tracing::debug;

use crate::models::Account;

/// Account-linking flows owned by the surrounding application.
///
/// Results are not reported back; a successful link or reconnect arrives
/// later as a new account snapshot.
pub trait AccountLinking {
    fn link(&self, institution: &str);
    fn reconnect(&self, account: &Account);
    fn disconnect(&self, account: &Account);
}

pub struct NoopLinking;

impl AccountLinking for NoopLinking {
    fn link(&self, institution: &str) {
        debug!("Link requested for institution [{institution}]");
    }

    fn reconnect(&self, account: &Account) {
        debug!("Reconnect requested for account [{}]", account.account_id);
    }

    fn disconnect(&self, account: &Account) {
        debug!("Disconnect requested for account [{}]", account.account_id);
    }
}
