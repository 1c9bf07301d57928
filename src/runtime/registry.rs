//! Topic registration and matching.

use heapless::{String, Vec};

use super::traits::TopicCollector;

/// Maximum length for a single topic string.
pub const MAX_TOPIC_LEN: usize = 128;

/// A set of subscribed topic filters.
///
/// The registry owns the topic strings (copies them on add). Adding a
/// filter that is already present succeeds without storing it twice.
///
/// # Example
///
/// ```ignore
/// let mut registry = TopicRegistry::<8>::new();
/// light.publish_config(&mut link);
///
/// // Subscribe for real once the client is connected
/// for topic in registry.iter() {
///     client.subscribe(topic, QoS::AtMostOnce).await?;
/// }
/// ```
#[derive(Default)]
pub struct TopicRegistry<const MAX_TOPICS: usize> {
    topics: Vec<String<MAX_TOPIC_LEN>, MAX_TOPICS>,
}

impl<const MAX_TOPICS: usize> TopicRegistry<MAX_TOPICS> {
    /// Create a new empty topic registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a topic filter by copying the string.
    ///
    /// Returns `true` if the filter is now registered, `false` if the
    /// registry is full or the topic is too long.
    pub fn add_topic(&mut self, topic: &str) -> bool {
        if self.contains(topic) {
            return true;
        }

        let mut owned = String::new();
        if owned.push_str(topic).is_err() {
            return false;
        }

        self.topics.push(owned).is_ok()
    }

    /// Whether this exact filter string was registered.
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t.as_str() == topic)
    }

    /// Whether any registered filter matches a concrete topic name.
    pub fn matches(&self, topic: &str) -> bool {
        self.topics.iter().any(|filter| topic_matches(filter, topic))
    }

    /// Get an iterator over the registered topics.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|s| s.as_str())
    }

    /// Get the number of registered topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Clear all registered topics.
    pub fn clear(&mut self) {
        self.topics.clear();
    }
}

impl<const MAX_TOPICS: usize> TopicCollector for TopicRegistry<MAX_TOPICS> {
    fn add(&mut self, topic: &str) -> bool {
        self.add_topic(topic)
    }
}

/// MQTT topic filter matching with `+` and `#` wildcards.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');

    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
