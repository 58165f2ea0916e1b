use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A user as bound from request bodies and rendered as JSON or XML.
///
/// Missing fields in an incoming body default to empty / zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    /// RFC 3339 creation timestamp.
    pub created: String,
}

impl User {
    /// A new user stamped with the current time. The id is assigned later.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            age,
            created: now_rfc3339(),
        }
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn stamp_created(&mut self) {
        self.created = now_rfc3339();
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn new_stamps_creation_time() {
        let user = User::new("Ana", "ana@exemplo.com", 30);
        assert_eq!(user.id, 0);
        assert_eq!(user.name, "Ana");
        assert!(DateTime::parse_from_rfc3339(&user.created).is_ok(), "{}", user.created);
    }

    #[test]
    fn set_id() {
        let mut user = User::new("Ana", "ana@exemplo.com", 30);
        user.set_id(42);
        assert_eq!(user.id, 42);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let user: User = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.age, 0);
        assert!(user.created.is_empty());
    }

    #[test]
    fn negative_age_binds() {
        let user: User = serde_json::from_str(r#"{"name":"Ana","age":-1}"#).unwrap();
        assert_eq!(user.age, -1);
    }

    #[test]
    fn json_field_names() {
        let mut user = User::new("Ana", "ana@exemplo.com", 30);
        user.set_id(1);
        let value = serde_json::to_value(&user).unwrap();
        for key in ["id", "name", "email", "age", "created"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
