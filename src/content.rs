use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ContentError;

#[cfg(test)]
mod tests;

/// One unit of presentation content.
///
/// The navigation core only looks at `id`; `title` and `body` are carried for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub body: serde_json::Value,
}

impl Slide {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: serde_json::Value::Null,
        }
    }
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Read access to an ordered, non-empty slide sequence.
pub trait SlideSource {
    /// Number of slides. Never zero.
    fn slide_count(&self) -> usize;

    /// Slide at `index`.
    ///
    /// Callers guarantee `index < slide_count()`.
    fn slide_at(&self, index: usize) -> &Slide;
}

/// Immutable slide deck loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    slides: Vec<Slide>,
}

impl Presentation {
    /// Builds a presentation, rejecting empty decks and repeated ids.
    pub fn new(slides: Vec<Slide>) -> Result<Self, ContentError> {
        if slides.is_empty() {
            return Err(ContentError::Empty);
        }
        let mut seen = HashSet::new();
        for slide in &slides {
            if !seen.insert(slide.id.as_str()) {
                return Err(ContentError::DuplicateId(slide.id.clone()));
            }
        }
        Ok(Self { slides })
    }

    /// Parses either `{"slides": [...]}` or a bare array of slides.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Deck { slides: Vec<Slide> },
            List(Vec<Slide>),
        }
        let slides = match serde_json::from_str(json)? {
            Raw::Deck { slides } | Raw::List(slides) => slides,
        };
        Self::new(slides)
    }

    /// Placeholder deck `slide-1 ..= slide-{count}`; at least one slide.
    pub fn numbered(count: usize) -> Self {
        let slides = (1..=count.max(1))
            .map(|n| Slide::new(format!("slide-{n}")).with_title(format!("Slide {n}")))
            .collect();
        Self { slides }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }
}

impl SlideSource for Presentation {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }
    fn slide_at(&self, index: usize) -> &Slide {
        &self.slides[index]
    }
}
