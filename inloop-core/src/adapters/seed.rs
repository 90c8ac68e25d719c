//! Built-in accounts
//!
//! Three fixed accounts, one per role, that exist on every install. They are
//! never written to storage and cannot be removed. Their profile edits live
//! only in the current-session record.

use crate::domain::{Account, Credential, Role, PLACEHOLDER_AVATAR};

/// A built-in account with its login secret
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub credential: Credential,
    pub account: Account,
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
    bio: &str,
    department: &str,
    year: u32,
) -> SeedAccount {
    SeedAccount {
        credential: Credential::plaintext(password),
        account: Account {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            avatar: Some(PLACEHOLDER_AVATAR.to_string()),
            bio: Some(bio.to_string()),
            department: Some(department.to_string()),
            year: Some(year),
        },
    }
}

/// The built-in accounts, keyed by their (already lower-case) emails
pub fn builtin_accounts() -> Vec<SeedAccount> {
    vec![
        seed(
            "1",
            "admin",
            "admin@inloop.com",
            "admin",
            Role::Administrator,
            "System Administrator",
            "Administration",
            0,
        ),
        seed(
            "2",
            "Computer Science Club",
            "club@inloop.com",
            "club123",
            Role::Organization,
            "Official Computer Science Club",
            "Computer Science",
            0,
        ),
        seed(
            "3",
            "John Doe",
            "student@inloop.com",
            "student123",
            Role::Member,
            "Computer Science Student",
            "Computer Science",
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize_email;

    #[test]
    fn test_one_seed_per_role() {
        let seeds = builtin_accounts();
        for role in Role::ALL {
            assert_eq!(seeds.iter().filter(|s| s.account.role == role).count(), 1);
        }
    }

    #[test]
    fn test_seed_emails_are_normalized_and_unique() {
        let seeds = builtin_accounts();
        let mut emails: Vec<_> = seeds.iter().map(|s| s.account.email.clone()).collect();
        for email in &emails {
            assert_eq!(email, &normalize_email(email));
        }
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), seeds.len());
    }
}
