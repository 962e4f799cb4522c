//! Positional edit requests
//!
//! An edit names its target region (the document, an anchored element, or a
//! heading-delimited range), a placement relative to it, and content. The
//! service receives these as a numeric location code plus `section_id` or
//! `document_range`.

use crate::{EditError, Result};
use address_resolver::{Placement, ResolvedTarget, Target};
use content_tree::AnchorId;
use remote_client::FormFields;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content sent in place of nothing for deletions; the form encoder drops
/// empty strings
pub const DELETE_CONTENT: &str = " ";

/// Markup dialect of edit content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Html,
    #[default]
    Markdown,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service location code for a placement against a target
pub fn location_code(target: &Target, placement: Placement) -> Result<u8> {
    let code = match (target, placement) {
        (Target::Document, Placement::Append) => 0,
        (Target::Document, Placement::Prepend) => 1,
        (Target::Anchor(_), Placement::After) => 2,
        (Target::Anchor(_), Placement::Before) => 3,
        (Target::Anchor(_), Placement::Replace) => 4,
        (Target::Anchor(_), Placement::Delete) => 5,
        (Target::Range(_), Placement::After) => 6,
        (Target::Range(_), Placement::Before) => 7,
        (Target::Range(_), Placement::Replace) => 8,
        (Target::Range(_), Placement::Delete) => 9,
        (target, placement) => {
            return Err(EditError::InvalidPlacement(format!(
                "{:?} against {:?}",
                placement, target
            )))
        }
    };
    Ok(code)
}

/// Anchor or range identifier as transmitted: `;` becomes `_`
pub fn sanitize_identifier(id: &str) -> String {
    id.replace(';', "_")
}

/// A validated edit, ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub content: String,
    pub target: Target,
    pub placement: Placement,
    pub format: Format,
}

impl EditRequest {
    /// Edit against a resolved target
    pub fn new(content: impl Into<String>, resolved: ResolvedTarget, format: Format) -> Result<Self> {
        let ResolvedTarget { target, placement } = resolved;
        match &target {
            Target::Anchor(anchor) if anchor.as_str().is_empty() => {
                return Err(EditError::MissingArgument("section_id"))
            }
            Target::Range(range) if range.is_empty() => {
                return Err(EditError::MissingArgument("document_range"))
            }
            _ => {}
        }
        location_code(&target, placement)?;

        let content = if placement == Placement::Delete {
            DELETE_CONTENT.to_string()
        } else {
            content.into()
        };
        Ok(Self {
            content,
            target,
            placement,
            format,
        })
    }

    /// Edit from a placement and an optional anchor.
    ///
    /// `Prepend`/`Append` address the whole document and ignore `anchor`;
    /// every other placement requires one.
    pub fn positional(
        content: impl Into<String>,
        placement: Placement,
        anchor: Option<&str>,
        format: Format,
    ) -> Result<Self> {
        let target = if placement.is_relative() {
            let anchor = anchor
                .filter(|a| !a.is_empty())
                .ok_or(EditError::MissingArgument("section_id"))?;
            Target::Anchor(AnchorId::from(anchor))
        } else {
            Target::Document
        };
        Self::new(content, ResolvedTarget { target, placement }, format)
    }

    /// Edit relative to the range introduced by `heading`
    pub fn range(
        content: impl Into<String>,
        placement: Placement,
        heading: &str,
        format: Format,
    ) -> Result<Self> {
        let target = Target::Range(heading.to_string());
        Self::new(content, ResolvedTarget { target, placement }, format)
    }

    /// The service location code
    pub fn location(&self) -> u8 {
        // validated at construction
        location_code(&self.target, self.placement).unwrap_or_default()
    }

    /// Form fields for `threads/edit-document`
    pub fn to_form(&self, thread_id: &str) -> FormFields {
        let form = FormFields::new()
            .with("thread_id", thread_id)
            .with("content", self.content.as_str())
            .with("location", self.location())
            .with("format", self.format.as_str());
        match &self.target {
            Target::Document => form,
            Target::Anchor(anchor) => form.with("section_id", sanitize_identifier(anchor.as_str())),
            Target::Range(range) => form.with("document_range", sanitize_identifier(range)),
        }
    }

    /// The same target replaced with blank content, used when the service
    /// refuses a delete
    pub fn replace_fallback(&self) -> Self {
        Self {
            content: DELETE_CONTENT.to_string(),
            target: self.target.clone(),
            placement: Placement::Replace,
            format: self.format,
        }
    }
}
