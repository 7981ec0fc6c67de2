use serde::{Deserialize, Serialize};

/// A stored sales lead
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
}

/// Body of `POST /contacts`. Neither field is validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub phone_number: String,
}
