//! Suggestion model matching the studio frontend contract.
//!
//! The creation mapper and the partial-update merge both live here so every
//! store backend shares one canonical transform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Complexity classification submitted with a suggestion.
///
/// Unknown values are rejected at deserialization instead of being passed
/// through as raw strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    Low,
    Medium,
    High,
    NewVisual,
    Bug,
    Improvement,
    Feature,
    Enhancement,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
            Complexity::NewVisual => "new-visual",
            Complexity::Bug => "bug",
            Complexity::Improvement => "improvement",
            Complexity::Feature => "feature",
            Complexity::Enhancement => "enhancement",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Complexity::Low),
            "medium" => Some(Complexity::Medium),
            "high" => Some(Complexity::High),
            "new-visual" => Some(Complexity::NewVisual),
            "bug" => Some(Complexity::Bug),
            "improvement" => Some(Complexity::Improvement),
            "feature" => Some(Complexity::Feature),
            "enhancement" => Some(Complexity::Enhancement),
            _ => None,
        }
    }
}

/// Contributor skill level, always derived from complexity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    /// Fixed derivation table. Anything not listed lands on intermediate.
    pub fn from_complexity(complexity: Complexity) -> Self {
        match complexity {
            Complexity::NewVisual | Complexity::Bug => Difficulty::Beginner,
            Complexity::Improvement | Complexity::Enhancement => Difficulty::Intermediate,
            Complexity::Feature => Difficulty::Advanced,
            _ => Difficulty::Intermediate,
        }
    }
}

/// A comment attached to a suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// A user-submitted feature/improvement record with voting and triage metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub complexity: Complexity,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_dev_time: Option<f64>,
    /// Free-form triage state; transitions are not validated by this layer.
    pub status: String,
    pub created_at: String,
    pub last_modified: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub views: i64,
    pub favorites: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Opaque implementation payload supplied by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<JsonValue>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub version: String,
}

/// Request body for creating a new suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuggestionRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    pub complexity: Complexity,
    #[serde(default)]
    pub estimated_dev_time: Option<f64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub implementation: Option<JsonValue>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

impl CreateSuggestionRequest {
    /// Map the inbound payload into a canonical record.
    ///
    /// Pure transform; the caller supplies the current time. When no id is
    /// given the record gets `suggestion-<epoch millis>` — two requests in the
    /// same millisecond would collide, which matches the deployed behavior.
    pub fn into_record(self, now: DateTime<Utc>) -> Suggestion {
        let timestamp = now.to_rfc3339();
        let id = self
            .id
            .unwrap_or_else(|| format!("suggestion-{}", now.timestamp_millis()));
        let difficulty = Difficulty::from_complexity(self.complexity);

        Suggestion {
            id,
            title: self.title,
            description: self.description,
            author: self.author,
            category: self.category,
            complexity: self.complexity,
            difficulty,
            estimated_dev_time: self.estimated_dev_time,
            status: "pending".to_string(),
            created_at: timestamp.clone(),
            last_modified: timestamp,
            upvotes: 0,
            downvotes: 0,
            views: 0,
            favorites: 0,
            tags: self.tags.unwrap_or_default(),
            comments: Vec::new(),
            implementation: self.implementation,
            dependencies: self.dependencies.unwrap_or_default(),
            version: "1.0.0".to_string(),
        }
    }
}

/// Request body for partially updating a suggestion.
///
/// Difficulty is deliberately absent: it is recomputed whenever complexity
/// changes and can never be set directly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSuggestionRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub complexity: Option<Complexity>,
    #[serde(default)]
    pub estimated_dev_time: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub upvotes: Option<i64>,
    #[serde(default)]
    pub downvotes: Option<i64>,
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub favorites: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
    #[serde(default)]
    pub implementation: Option<JsonValue>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub version: Option<String>,
}

impl UpdateSuggestionRequest {
    /// A negative counter write is rejected before it reaches any store.
    pub fn negative_counter(&self) -> Option<&'static str> {
        if self.upvotes.is_some_and(|v| v < 0) {
            Some("upvotes")
        } else if self.downvotes.is_some_and(|v| v < 0) {
            Some("downvotes")
        } else if self.views.is_some_and(|v| v < 0) {
            Some("views")
        } else if self.favorites.is_some_and(|v| v < 0) {
            Some("favorites")
        } else {
            None
        }
    }
}

impl Suggestion {
    /// Merge a partial update into this record.
    ///
    /// Bumps lastModified and re-derives difficulty when complexity changes.
    /// The id and createdAt are immutable.
    pub fn apply_update(&mut self, request: &UpdateSuggestionRequest, now: DateTime<Utc>) {
        if let Some(title) = &request.title {
            self.title = title.clone();
        }
        if let Some(description) = &request.description {
            self.description = description.clone();
        }
        if let Some(author) = &request.author {
            self.author = author.clone();
        }
        if let Some(category) = &request.category {
            self.category = Some(category.clone());
        }
        if let Some(complexity) = request.complexity {
            self.complexity = complexity;
            self.difficulty = Difficulty::from_complexity(complexity);
        }
        if let Some(estimate) = request.estimated_dev_time {
            self.estimated_dev_time = Some(estimate);
        }
        if let Some(status) = &request.status {
            self.status = status.clone();
        }
        if let Some(upvotes) = request.upvotes {
            self.upvotes = upvotes;
        }
        if let Some(downvotes) = request.downvotes {
            self.downvotes = downvotes;
        }
        if let Some(views) = request.views {
            self.views = views;
        }
        if let Some(favorites) = request.favorites {
            self.favorites = favorites;
        }
        if let Some(tags) = &request.tags {
            self.tags = tags.clone();
        }
        if let Some(comments) = &request.comments {
            self.comments = comments.clone();
        }
        if let Some(implementation) = &request.implementation {
            self.implementation = Some(implementation.clone());
        }
        if let Some(dependencies) = &request.dependencies {
            self.dependencies = dependencies.clone();
        }
        if let Some(version) = &request.version {
            self.version = version.clone();
        }
        self.last_modified = now.to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_request(complexity: Complexity) -> CreateSuggestionRequest {
        CreateSuggestionRequest {
            id: None,
            title: "T".to_string(),
            description: "D".to_string(),
            author: "A".to_string(),
            category: None,
            complexity,
            estimated_dev_time: None,
            tags: None,
            implementation: None,
            dependencies: None,
        }
    }

    #[test]
    fn test_difficulty_derivation_table() {
        assert_eq!(
            Difficulty::from_complexity(Complexity::NewVisual),
            Difficulty::Beginner
        );
        assert_eq!(
            Difficulty::from_complexity(Complexity::Bug),
            Difficulty::Beginner
        );
        assert_eq!(
            Difficulty::from_complexity(Complexity::Improvement),
            Difficulty::Intermediate
        );
        assert_eq!(
            Difficulty::from_complexity(Complexity::Enhancement),
            Difficulty::Intermediate
        );
        assert_eq!(
            Difficulty::from_complexity(Complexity::Feature),
            Difficulty::Advanced
        );
        // Default branch
        assert_eq!(
            Difficulty::from_complexity(Complexity::Low),
            Difficulty::Intermediate
        );
        assert_eq!(
            Difficulty::from_complexity(Complexity::Medium),
            Difficulty::Intermediate
        );
        assert_eq!(
            Difficulty::from_complexity(Complexity::High),
            Difficulty::Intermediate
        );
    }

    #[test]
    fn test_complexity_rejects_unknown_values() {
        assert!(serde_json::from_str::<Complexity>("\"bug\"").is_ok());
        assert!(serde_json::from_str::<Complexity>("\"new-visual\"").is_ok());
        assert!(serde_json::from_str::<Complexity>("\"urgent\"").is_err());
        assert!(serde_json::from_str::<Complexity>("\"BUG\"").is_err());
    }

    #[test]
    fn test_mapper_defaults() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let record = create_request(Complexity::Bug).into_record(now);

        assert_eq!(record.id, format!("suggestion-{}", now.timestamp_millis()));
        assert_eq!(record.difficulty, Difficulty::Beginner);
        assert_eq!(record.status, "pending");
        assert_eq!(record.upvotes, 0);
        assert_eq!(record.downvotes, 0);
        assert_eq!(record.views, 0);
        assert_eq!(record.favorites, 0);
        assert!(record.tags.is_empty());
        assert!(record.comments.is_empty());
        assert!(record.dependencies.is_empty());
        assert_eq!(record.version, "1.0.0");
        assert_eq!(record.created_at, record.last_modified);
    }

    #[test]
    fn test_mapper_keeps_explicit_id() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let mut request = create_request(Complexity::Feature);
        request.id = Some("my-id".to_string());
        assert_eq!(request.into_record(now).id, "my-id");
    }

    #[test]
    fn test_generated_ids_distinct_across_milliseconds() {
        let first = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let second = Utc.timestamp_millis_opt(1_700_000_000_001).unwrap();
        let a = create_request(Complexity::Low).into_record(first);
        let b = create_request(Complexity::Low).into_record(second);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_generated_ids_collide_within_one_millisecond() {
        // Documented gap in the id scheme, asserted as current behavior.
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = create_request(Complexity::Low).into_record(now);
        let b = create_request(Complexity::High).into_record(now);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_apply_update_rederives_difficulty() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let mut record = create_request(Complexity::Bug).into_record(now);
        assert_eq!(record.difficulty, Difficulty::Beginner);

        let later = Utc.with_ymd_and_hms(2026, 1, 15, 12, 5, 0).unwrap();
        let update = UpdateSuggestionRequest {
            complexity: Some(Complexity::Feature),
            ..Default::default()
        };
        record.apply_update(&update, later);

        assert_eq!(record.difficulty, Difficulty::Advanced);
        assert_eq!(record.last_modified, later.to_rfc3339());
        assert!(record.last_modified > record.created_at);
    }

    #[test]
    fn test_apply_update_leaves_unset_fields() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let mut record = create_request(Complexity::Improvement).into_record(now);
        record.apply_update(
            &UpdateSuggestionRequest {
                upvotes: Some(7),
                ..Default::default()
            },
            now,
        );
        assert_eq!(record.upvotes, 7);
        assert_eq!(record.title, "T");
        assert_eq!(record.status, "pending");
    }

    #[test]
    fn test_negative_counter_detection() {
        let update = UpdateSuggestionRequest {
            downvotes: Some(-1),
            ..Default::default()
        };
        assert_eq!(update.negative_counter(), Some("downvotes"));
        assert_eq!(UpdateSuggestionRequest::default().negative_counter(), None);
    }
}
