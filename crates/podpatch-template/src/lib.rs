//! Typed pod template patching.
//!
//! Builds on [`podpatch_merge`] to apply a user-authored partial pod template
//! to a generated one and read the result back into a typed model.
//!
//! # Example
//!
//! ```rust
//! use podpatch_template::{PodTemplatePatch, parse_template};
//!
//! let base = parse_template("spec: {containers: [{name: web, image: web-v1}]}").unwrap();
//! let patch = PodTemplatePatch::new("spec: {containers: [{name: web, image: web-v2}]}");
//!
//! let patched = patch.apply(&base).unwrap();
//! assert_eq!(patched.spec.containers[0].image.as_deref(), Some("web-v2"));
//! ```

mod adapter;
mod error;
mod patch;
pub mod pod;

pub use adapter::{merge_into_template_spec, merge_template_text, parse_template};
pub use error::{Result, TemplateError};
pub use patch::PodTemplatePatch;
pub use pod::PodTemplateSpec;
