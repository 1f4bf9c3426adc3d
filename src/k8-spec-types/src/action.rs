use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// operation requested against a resource
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Delete,
    List,
    Patch,
    Read,
    Replace,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Delete,
        Action::List,
        Action::Patch,
        Action::Read,
        Action::Replace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Patch => "patch",
            Self::Read => "read",
            Self::Replace => "replace",
        }
    }

    /// true if the action addresses a single named resource
    /// rather than the collection
    pub fn targets_item(&self) -> bool {
        matches!(
            self,
            Self::Delete | Self::Patch | Self::Read | Self::Replace
        )
    }

    pub fn http_method(&self) -> &'static str {
        match self {
            Self::Create => "POST",
            Self::Delete => "DELETE",
            Self::List | Self::Read => "GET",
            Self::Patch => "PATCH",
            Self::Replace => "PUT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|action| action.as_str() == s)
            .copied()
            .ok_or_else(|| ParseActionError(s.to_owned()))
    }
}

#[cfg(test)]
mod test {

    use super::Action;

    #[test]
    fn test_action_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert!("upsert".parse::<Action>().is_err());
    }

    #[test]
    fn test_targets_item() {
        let item_actions: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|action| action.targets_item())
            .collect();
        assert_eq!(
            item_actions,
            vec![Action::Delete, Action::Patch, Action::Read, Action::Replace]
        );
    }
}
