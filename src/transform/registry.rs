//! Transform registry implementation
//!
//! The registry maps transform names to implementations. It is populated once
//! at startup and immutable afterwards, so concurrent reads need no locking.
//! A name without a loaded implementation resolves to identity; availability
//! is recorded per name at build time so operators can see what actually runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TransformConfig;
use crate::error::{Error, Result};
use crate::logging::Timer;

/// A pure transform over an image payload
///
/// Implementations receive the raw bytes and the declared dimensions and
/// return a new payload. Whether `width * height` matches the byte count is
/// each implementation's own concern.
pub type TransformFn = Arc<dyn Fn(&[u8], u32, u32) -> Vec<u8> + Send + Sync>;

/// Whether a transform name resolves to a real implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// A native implementation is loaded and will run
    Native,
    /// No implementation is loaded; the name resolves to identity
    Fallback,
}

/// Registry entry for a single transform name
struct TransformEntry {
    availability: Availability,
    implementation: Option<TransformFn>,
}

/// The result of applying a transform
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    /// The output payload
    pub data: Vec<u8>,
    /// Whether a native implementation ran (false means identity passthrough)
    pub applied: bool,
}

/// Builder for a [`TransformRegistry`]
///
/// Registration happens at startup only; the built registry is immutable.
#[derive(Default)]
pub struct TransformRegistryBuilder {
    entries: HashMap<String, TransformEntry>,
}

impl TransformRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a transform name to a native implementation
    ///
    /// Last writer wins if the same name is registered twice.
    pub fn register(mut self, name: impl Into<String>, implementation: TransformFn) -> Self {
        self.entries.insert(
            name.into(),
            TransformEntry {
                availability: Availability::Native,
                implementation: Some(implementation),
            },
        );
        self
    }

    /// Enable a transform name without an implementation
    ///
    /// The name resolves to identity at apply time. Declaring a name that
    /// already has a native implementation is a no-op.
    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.entries.entry(name.into()).or_insert(TransformEntry {
            availability: Availability::Fallback,
            implementation: None,
        });
        self
    }

    /// Finalize the registry
    ///
    /// Fallback names are logged here, once, rather than on every request.
    pub fn build(self) -> TransformRegistry {
        let registry = TransformRegistry {
            entries: self.entries,
        };

        let fallback = registry.fallback_names();
        if !fallback.is_empty() {
            tracing::warn!(
                transforms = ?fallback,
                "No native implementation loaded; these transforms fall back to identity"
            );
        }

        tracing::info!(
            registered = registry.len(),
            fallback = fallback.len(),
            "Transform registry initialized"
        );

        registry
    }
}

/// Immutable map from transform name to implementation
pub struct TransformRegistry {
    entries: HashMap<String, TransformEntry>,
}

impl TransformRegistry {
    /// Start building a registry
    pub fn builder() -> TransformRegistryBuilder {
        TransformRegistryBuilder::new()
    }

    /// Build a registry from configuration
    ///
    /// Every enabled name is declared; native implementations are injected by
    /// the embedding application through [`TransformRegistryBuilder::register`].
    pub fn from_config(config: &TransformConfig) -> Self {
        let mut builder = Self::builder();
        for name in config.enabled_list() {
            builder = builder.declare(name);
        }
        builder.build()
    }

    /// Number of registered transform names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Availability of a transform name, if registered
    pub fn availability(&self, name: &str) -> Option<Availability> {
        self.entries.get(name).map(|e| e.availability)
    }

    /// All registered names with their availability, sorted by name
    pub fn catalog(&self) -> Vec<(String, Availability)> {
        let mut catalog: Vec<(String, Availability)> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.availability))
            .collect();
        catalog.sort_by(|a, b| a.0.cmp(&b.0));
        catalog
    }

    /// Names registered without a native implementation, sorted
    pub fn fallback_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.availability == Availability::Fallback)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Apply a transform by name
    ///
    /// An unknown or unimplemented name never fails the request: the payload
    /// passes through unchanged and the outcome is flagged as not applied.
    pub fn apply(&self, name: &str, data: Vec<u8>, width: u32, height: u32) -> TransformOutcome {
        match self.entries.get(name) {
            Some(TransformEntry {
                implementation: Some(f),
                ..
            }) => TransformOutcome {
                data: f(&data, width, height),
                applied: true,
            },
            Some(_) => {
                tracing::debug!(transform = %name, "Fallback transform, passing payload through");
                TransformOutcome {
                    data,
                    applied: false,
                }
            },
            None => {
                tracing::debug!(transform = %name, "Unknown transform, passing payload through");
                TransformOutcome {
                    data,
                    applied: false,
                }
            },
        }
    }

    /// Apply a transform on the blocking pool under an execution budget
    ///
    /// Transforms are CPU-bound and may be slow on large images, so they run
    /// off the async workers. A run that exceeds the budget fails that request
    /// with [`Error::TransformTimeout`]; the blocking task itself cannot be
    /// cancelled and finishes in the background.
    pub async fn apply_with_timeout(
        self: Arc<Self>,
        name: &str,
        data: Vec<u8>,
        width: u32,
        height: u32,
        budget: Duration,
    ) -> Result<TransformOutcome> {
        let registry = self;
        let transform = name.to_string();
        let timer = Timer::start(format!("transform:{}", name));

        let task =
            tokio::task::spawn_blocking(move || registry.apply(&transform, data, width, height));

        match tokio::time::timeout(budget, task).await {
            Ok(Ok(outcome)) => {
                timer.stop();
                Ok(outcome)
            },
            Ok(Err(e)) => Err(Error::internal(format!("Transform task failed: {}", e))),
            Err(_) => Err(Error::transform_timeout(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invert() -> TransformFn {
        Arc::new(|data: &[u8], _width: u32, _height: u32| -> Vec<u8> {
            data.iter().map(|b| 255 - *b).collect()
        })
    }

    #[test]
    fn test_unknown_transform_is_identity() {
        let registry = TransformRegistry::builder().build();

        let outcome = registry.apply("unknown_filter", vec![1, 2, 3], 1, 3);
        assert_eq!(outcome.data, vec![1, 2, 3]);
        assert!(!outcome.applied);
    }

    #[test]
    fn test_declared_transform_falls_back_to_identity() {
        let registry = TransformRegistry::builder().declare("blur").build();

        let outcome = registry.apply("blur", vec![1, 2, 3], 1, 3);
        assert_eq!(outcome.data, vec![1, 2, 3]);
        assert!(!outcome.applied);
        assert_eq!(registry.availability("blur"), Some(Availability::Fallback));
    }

    #[test]
    fn test_native_transform_runs() {
        let registry = TransformRegistry::builder().register("invert", invert()).build();

        let outcome = registry.apply("invert", vec![0, 255, 100], 1, 3);
        assert_eq!(outcome.data, vec![255, 0, 155]);
        assert!(outcome.applied);
        assert_eq!(registry.availability("invert"), Some(Availability::Native));
    }

    #[test]
    fn test_register_last_writer_wins() {
        let doubler: TransformFn = Arc::new(|data: &[u8], _, _| -> Vec<u8> {
            data.iter().map(|b| b.wrapping_mul(2)).collect()
        });
        let registry = TransformRegistry::builder()
            .register("invert", invert())
            .register("invert", doubler)
            .build();

        let outcome = registry.apply("invert", vec![3], 1, 1);
        assert_eq!(outcome.data, vec![6]);
    }

    #[test]
    fn test_declare_does_not_downgrade_native() {
        let registry = TransformRegistry::builder()
            .register("invert", invert())
            .declare("invert")
            .build();

        assert_eq!(registry.availability("invert"), Some(Availability::Native));
    }

    #[test]
    fn test_zero_length_payload_round_trips() {
        let registry = TransformRegistry::builder().declare("blur").build();

        let outcome = registry.apply("blur", Vec::new(), 0, 0);
        assert!(outcome.data.is_empty());
        assert!(!outcome.applied);
    }

    #[test]
    fn test_catalog_and_fallback_names() {
        let registry = TransformRegistry::builder()
            .declare("emboss")
            .register("invert", invert())
            .declare("blur")
            .build();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.catalog(),
            vec![
                ("blur".to_string(), Availability::Fallback),
                ("emboss".to_string(), Availability::Fallback),
                ("invert".to_string(), Availability::Native),
            ]
        );
        assert_eq!(registry.fallback_names(), vec!["blur", "emboss"]);
    }

    #[test]
    fn test_from_config_declares_enabled_names() {
        let config = TransformConfig {
            enabled: "blur,invert".to_string(),
            timeout_ms: 5000,
        };

        let registry = TransformRegistry::from_config(&config);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.availability("blur"), Some(Availability::Fallback));
        assert_eq!(registry.availability("grayscale"), None);
    }

    #[tokio::test]
    async fn test_apply_with_timeout_success() {
        let registry = Arc::new(TransformRegistry::builder().register("invert", invert()).build());

        let outcome = registry
            .clone()
            .apply_with_timeout("invert", vec![0], 1, 1, Duration::from_secs(1))
            .await
            .expect("should finish within budget");

        assert_eq!(outcome.data, vec![255]);
        assert!(outcome.applied);
    }

    #[tokio::test]
    async fn test_apply_with_timeout_exceeding_budget() {
        let slow: TransformFn = Arc::new(|data, _, _| {
            std::thread::sleep(Duration::from_millis(500));
            data.to_vec()
        });
        let registry = Arc::new(TransformRegistry::builder().register("slow", slow).build());

        let result = registry
            .apply_with_timeout("slow", vec![1], 1, 1, Duration::from_millis(20))
            .await;

        assert!(matches!(result, Err(Error::TransformTimeout(_))));
    }
}
