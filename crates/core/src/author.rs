//! Bid author vocabulary: a bid is placed either by an individual employee
//! or on behalf of an organization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const AUTHOR_TYPE_USER: &str = "User";
pub const AUTHOR_TYPE_ORGANIZATION: &str = "Organization";

/// Who placed a bid. Determines both the meaning of `author_id` and who is
/// allowed to edit the bid afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidAuthorType {
    User,
    Organization,
}

impl BidAuthorType {
    pub const fn as_str(self) -> &'static str {
        match self {
            BidAuthorType::User => AUTHOR_TYPE_USER,
            BidAuthorType::Organization => AUTHOR_TYPE_ORGANIZATION,
        }
    }
}

impl fmt::Display for BidAuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidAuthorType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AUTHOR_TYPE_USER => Ok(BidAuthorType::User),
            AUTHOR_TYPE_ORGANIZATION => Ok(BidAuthorType::Organization),
            other => Err(CoreError::Validation(format!(
                "Invalid author type '{other}'. Must be one of: {AUTHOR_TYPE_USER}, {AUTHOR_TYPE_ORGANIZATION}"
            ))),
        }
    }
}
