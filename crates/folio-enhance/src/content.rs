//! Site content: the profile and the project catalog.
//!
//! Content lives in `data/site.json` and is parsed once at initialization.
//! Adding a project means adding an entry there and a matching
//! `data-project` trigger in the page.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bundled content asset.
pub const BUNDLED_SITE_JSON: &str = include_str!("../data/site.json");

/// Default contact form endpoint when the content does not name one.
pub const DEFAULT_FORM_ENDPOINT: &str = "https://formspree.io/f/your-formspree-id";

/// Default profile image path, relative to the page.
pub const DEFAULT_PROFILE_IMAGE: &str = "assets/images/profile.jpg";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse site content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("project #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate project id: {0}")]
    DuplicateId(String),

    #[error("project {0} has an empty title")]
    EmptyTitle(String),
}

/// Owner details used by the about section and the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub owner_name: String,
    #[serde(default = "default_profile_image")]
    pub profile_image: String,
    #[serde(default = "default_form_endpoint")]
    pub form_endpoint: String,
}

fn default_profile_image() -> String {
    DEFAULT_PROFILE_IMAGE.to_string()
}

fn default_form_endpoint() -> String {
    DEFAULT_FORM_ENDPOINT.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            owner_name: String::new(),
            profile_image: default_profile_image(),
            form_endpoint: default_form_endpoint(),
        }
    }
}

/// One entry of the project catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Live demo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    /// Source repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Ordered, immutable list of projects keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Result<Self, ContentError> {
        let catalog = Self { projects };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for (index, project) in self.projects.iter().enumerate() {
            if project.id.trim().is_empty() {
                return Err(ContentError::EmptyId { index });
            }
            if !seen.insert(project.id.as_str()) {
                return Err(ContentError::DuplicateId(project.id.clone()));
            }
            if project.title.trim().is_empty() {
                return Err(ContentError::EmptyTitle(project.id.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|p| p.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Everything the enhancer needs to know about the site owner and work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub projects: Catalog,
}

impl SiteContent {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: SiteContent = serde_json::from_str(json)?;
        content.projects.validate()?;
        Ok(content)
    }

    /// The content shipped with the crate.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(BUNDLED_SITE_JSON)
    }
}
