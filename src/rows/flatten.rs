use std::collections::{BTreeSet, HashSet};

use crate::pipeline::AccountGroups;
use crate::rows::VirtualRow;
use crate::types::AccountId;

/// Flattens grouped accounts into the ordered render list.
///
/// Group headers are emitted only when grouping is active. Members of a
/// collapsed group are skipped, which also hides a detail row inside it. The
/// single detail row, if any, directly follows its account row.
pub fn flatten<'a>(
    groups: &AccountGroups<'a>,
    collapsed: &BTreeSet<String>,
    expanded: Option<AccountId>,
    ignored: &HashSet<AccountId>
) -> Vec<VirtualRow<'a>> {
    let mut rows = Vec::new();

    for group in groups.iter() {
        let is_collapsed = groups.is_grouped() && collapsed.contains(&group.key);

        if groups.is_grouped() {
            rows.push(VirtualRow::Group {
                label: group.key.clone(),
                count: group.members.len(),
                collapsed: is_collapsed
            });
        }

        if is_collapsed {
            continue;
        }

        for account in group.members.iter().copied() {
            let cache_key = account.cache_key();

            rows.push(VirtualRow::Account {
                account,
                ignored: ignored.contains(&account.account_id),
                cache_key: cache_key.clone()
            });

            if expanded == Some(account.account_id) {
                rows.push(VirtualRow::Detail { account, cache_key });
            }
        }
    }

    rows
}
