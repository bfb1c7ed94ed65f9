//! Configuration options for ZOON encoding.
//!
//! [`EncodeOptions`] controls schema inference for the tabular form. Decoding
//! needs no options: everything the decoder needs is in the document header.
//!
//! ## Examples
//!
//! ```rust
//! use serde_zoon::{encode_with_options, zoon, EncodeOptions};
//!
//! let data = zoon!([
//!     { "id": 1, "tier": "gold" },
//!     { "id": 2, "tier": "gold" },
//! ]);
//!
//! // Disable enum inference entirely
//! let options = EncodeOptions::new().with_infer_enums(false);
//! let text = encode_with_options(&data, &options);
//! ```

use crate::schema::Schema;

/// Configuration options for ZOON encoding.
///
/// # Examples
///
/// ```rust
/// use serde_zoon::EncodeOptions;
///
/// // Defaults: infer enums, distinct-value threshold of 10, no fixed schema
/// let options = EncodeOptions::new();
/// assert!(options.infer_enums);
/// assert_eq!(options.enum_threshold, 10);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// When set, this schema is used as-is and inference is bypassed entirely.
    pub schema: Option<Schema>,
    /// Whether string fields with few distinct values become enum fields.
    pub infer_enums: bool,
    /// Maximum number of distinct values a string field may have and still be
    /// classified as an enum. A threshold of zero effectively disables enums.
    pub enum_threshold: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            schema: None,
            infer_enums: true,
            enum_threshold: 10,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (enum inference on, threshold 10).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies an explicit schema, bypassing inference entirely.
    ///
    /// The schema is used as-is; an empty field list degrades to a header-only
    /// document rather than failing.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Enables or disables enum inference for string fields.
    #[must_use]
    pub fn with_infer_enums(mut self, infer_enums: bool) -> Self {
        self.infer_enums = infer_enums;
        self
    }

    /// Sets the maximum distinct-value count for enum classification.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zoon::EncodeOptions;
    ///
    /// let options = EncodeOptions::new().with_enum_threshold(5);
    /// assert_eq!(options.enum_threshold, 5);
    /// ```
    #[must_use]
    pub fn with_enum_threshold(mut self, enum_threshold: usize) -> Self {
        self.enum_threshold = enum_threshold;
        self
    }
}
