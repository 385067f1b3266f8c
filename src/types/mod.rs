
/// Session-stable internal sequence id of an account.
pub type AccountId = u32;
pub type TransactionId = String;

/// Key under which an account's transaction detail is fetched and cached.
///
/// This is the provider's external account id when present, otherwise the
/// internal id rendered as a string.
pub type CacheKey = String;

pub fn cache_key_for(account_id: AccountId, external_id: Option<&str>) -> CacheKey {
    match external_id {
        Some(external_id) if !external_id.trim().is_empty() => external_id.to_string(),
        _ => account_id.to_string()
    }
}
