use async_graphql::{SimpleObject, ID};

use crate::masters::MasterEntry;

/// One row of a master table
#[derive(SimpleObject)]
pub struct Master {
    pub id: ID,
    pub name: String,
}

impl From<&MasterEntry> for Master {
    fn from(entry: &MasterEntry) -> Self {
        Self {
            id: ID(entry.id.to_string()),
            name: entry.name.clone(),
        }
    }
}
