use crate::models::Account;
use crate::pipeline::FilterOptions;

/// Keeps the accounts that pass the zero-balance and type filters, preserving order.
pub fn filter<'a>(accounts: &'a [Account], options: &FilterOptions) -> Vec<&'a Account> {
    accounts.iter()
        .filter(|account| !(options.hide_zero_balance && account.balance.is_zero()))
        .filter(|account| options.type_filters.is_empty() || options.type_filters.contains(&account.account_type))
        .collect()
}
