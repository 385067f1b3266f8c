use std::collections::HashMap;

use crate::models::Account;
use crate::pipeline::GroupBy;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountGroup<'a> {
    pub key: String,
    pub members: Vec<&'a Account>
}

/// Groups in first-seen order.
///
/// `GroupBy::None` produces one synthetic group with an empty key whose
/// header is never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountGroups<'a> {
    group_by: GroupBy,
    groups: Vec<AccountGroup<'a>>
}

impl<'a> AccountGroups<'a> {
    pub fn is_grouped(&self) -> bool {
        self.group_by != GroupBy::None
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountGroup<'a>> {
        self.groups.iter()
    }

    pub fn get(&self, key: &str) -> Option<&AccountGroup<'a>> {
        self.groups.iter().find(|group| group.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group<'a>(accounts: Vec<&'a Account>, group_by: GroupBy) -> AccountGroups<'a> {
    if group_by == GroupBy::None {
        return AccountGroups {
            group_by,
            groups: vec![AccountGroup { key: String::new(), members: accounts }]
        };
    }

    let mut groups: Vec<AccountGroup<'a>> = Vec::new();
    let mut positions = HashMap::<&str, usize>::new();

    for account in accounts {
        let key = match group_by {
            GroupBy::Institution => account.institution.as_str(),
            GroupBy::Type => account.account_type.as_str(),
            GroupBy::None => ""
        };

        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(AccountGroup { key: key.to_string(), members: Vec::new() });
            groups.len() - 1
        });

        groups[position].members.push(account);
    }

    AccountGroups { group_by, groups }
}
