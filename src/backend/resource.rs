use chrono::{DateTime, Utc};
use fake::Dummy;
use serde::{Deserialize, Deserializer, Serialize};

/// Status assigned to every newly created task.
///
pub const DEFAULT_TASK_STATUS: &str = "pending";

/// Defines authenticated user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Defines session data structure as issued by the auth service.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill in the absolute expiry from the relative one when the auth service
    /// omitted it.
    ///
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now.timestamp() + self.expires_in);
        }
        self
    }

    /// Returns true if the access token expires within the leeway.
    ///
    pub fn expires_within(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now.timestamp() + leeway_secs >= expires_at,
            None => false,
        }
    }
}

/// Defines the closed set of menu category filters.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    All,
    Breakfast,
    Lunch,
    Dinner,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::All,
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
    ];

    /// Returns the value used for the equality filter, or None for `All`.
    ///
    pub fn filter_value(&self) -> Option<&'static str> {
        match self {
            Category::All => None,
            Category::Breakfast => Some("Breakfast"),
            Category::Lunch => Some("Lunch"),
            Category::Dinner => Some("Dinner"),
        }
    }

    /// Returns the picker label.
    ///
    pub fn label(&self) -> &'static str {
        self.filter_value().unwrap_or("All Categories")
    }

    pub fn next(&self) -> Category {
        let index = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(index + 1) % Category::ALL.len()]
    }

    pub fn previous(&self) -> Category {
        let index = Category::ALL.iter().position(|c| c == self).unwrap_or(0);
        Category::ALL[(index + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::All
    }
}

/// Defines menu item data structure (a row of the `meals` table).
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub preparation_time: u32, // minutes
    #[serde(default, deserialize_with = "default_if_null")]
    pub calories: u32,
    #[serde(default, deserialize_with = "default_if_null")]
    pub price: f64,
    #[serde(default, deserialize_with = "default_if_null")]
    pub ingredients: Vec<String>,
}

impl MenuItem {
    /// Returns the price formatted in currency units with two decimals.
    ///
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Returns the message handed to the share interface.
    ///
    pub fn share_message(&self) -> String {
        format!("Check out {} - {}", self.name, self.description)
    }
}

/// Defines task data structure (a row of the `tasks` table).
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_task_status")]
    pub status: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_task_status() -> String {
    DEFAULT_TASK_STATUS.to_string()
}

/// Nullable columns arrive as explicit `null`; read those as the default.
///
fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(serde_json::Number),
}

/// Tables keyed by serial or bigint columns return numeric ids. They are kept
/// as text so the query filters and task reconciliation work the same way.
///
fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RowId::deserialize(deserializer)? {
        RowId::Text(id) => id,
        RowId::Number(id) => id.to_string(),
    })
}

/// Insert payload for a new task.
///
#[derive(Debug, Serialize)]
pub struct NewTask<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub user_id: &'a str,
}

/// Update payload for an existing task.
///
#[derive(Debug, Serialize)]
pub struct TaskChanges<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fake::{Fake, Faker};
    use serde_json::json;

    #[test]
    fn category_filter_values() {
        assert_eq!(Category::All.filter_value(), None);
        assert_eq!(Category::Breakfast.filter_value(), Some("Breakfast"));
        assert_eq!(Category::Lunch.filter_value(), Some("Lunch"));
        assert_eq!(Category::Dinner.filter_value(), Some("Dinner"));
        assert_eq!(Category::All.label(), "All Categories");
    }

    #[test]
    fn category_cycles_in_both_directions() {
        assert_eq!(Category::All.next(), Category::Breakfast);
        assert_eq!(Category::Dinner.next(), Category::All);
        assert_eq!(Category::All.previous(), Category::Dinner);
        assert_eq!(Category::Lunch.previous(), Category::Breakfast);
    }

    #[test]
    fn menu_item_from_row() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "7",
            "name": "Pancakes",
            "description": "Fluffy",
            "category": "Breakfast",
            "image_url": "https://example.com/p.png",
            "preparation_time": 15,
            "calories": 420,
            "price": 7.5,
            "ingredients": ["flour", "eggs", "milk"]
        }))
        .unwrap();
        assert_eq!(item.category.as_deref(), Some("Breakfast"));
        assert_eq!(item.ingredients, vec!["flour", "eggs", "milk"]);
        assert_eq!(item.formatted_price(), "$7.50");
        assert_eq!(item.share_message(), "Check out Pancakes - Fluffy");
    }

    #[test]
    fn menu_item_tolerates_missing_optional_columns() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "8",
            "name": "Soup",
            "category": null,
            "price": 3
        }))
        .unwrap();
        assert!(item.category.is_none());
        assert!(item.ingredients.is_empty());
        assert_eq!(item.formatted_price(), "$3.00");
    }

    #[test]
    fn menu_item_tolerates_null_columns() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "9",
            "name": "Toast",
            "description": null,
            "preparation_time": null,
            "calories": null,
            "price": null,
            "ingredients": null
        }))
        .unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.preparation_time, 0);
        assert_eq!(item.calories, 0);
        assert_eq!(item.formatted_price(), "$0.00");
        assert!(item.ingredients.is_empty());
    }

    #[test]
    fn numeric_ids_are_read_as_text() {
        let item: MenuItem = serde_json::from_value(json!({ "id": 1, "name": "Soup" })).unwrap();
        assert_eq!(item.id, "1");

        let task: Task = serde_json::from_value(json!({
            "id": 42,
            "title": "Buy milk",
            "user_id": "u1",
            "created_at": "2024-03-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(task.id, "42");
    }

    #[test]
    fn task_from_row_defaults_status() {
        let task: Task = serde_json::from_value(json!({
            "id": "a1",
            "title": "Buy milk",
            "description": null,
            "user_id": "u1",
            "created_at": "2024-03-01T10:00:00.123456+00:00",
            "updated_at": "2024-03-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(task.status, DEFAULT_TASK_STATUS);
        assert!(task.description.is_none());
        assert!(task.updated_at.is_some());
    }

    #[test]
    fn session_stamped_and_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut session: Session = Faker.fake();
        session.expires_in = 3600;
        session.expires_at = None;
        let session = session.stamped(now);
        assert_eq!(session.expires_at, Some(now.timestamp() + 3600));
        assert!(!session.expires_within(now, 60));
        assert!(session.expires_within(now, 3600));
    }
}
