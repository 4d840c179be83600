// Page domain model - the indexed regions panels write into
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ViewportSize")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
struct ViewportSize {
    width: u32,
    height: u32,
}

impl From<ViewportSize> for Viewport {
    fn from(size: ViewportSize) -> Self {
        Self::new(size.width, size.height)
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        // a zero-sized surface has no geometry to lay out
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600, 300)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionClass {
    LastUpdated,
    ResultsStateless,
}

impl RegionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionClass::LastUpdated => "last-updated",
            RegionClass::ResultsStateless => "results-stateless",
        }
    }
}

impl fmt::Display for RegionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page has no `{class}` region at index {index}")]
pub struct MissingRegion {
    pub class: RegionClass,
    pub index: usize,
}

/// Ordered collections of `last-updated` and `results-stateless` regions.
/// Each region holds whatever was last written to it; `None` means blank.
#[derive(Debug)]
pub struct Page {
    last_updated: Vec<RwLock<Option<String>>>,
    results_stateless: Vec<RwLock<Option<String>>>,
}

impl Page {
    pub fn with_panels(panel_count: usize) -> Self {
        Self {
            last_updated: (0..panel_count).map(|_| RwLock::new(None)).collect(),
            results_stateless: (0..panel_count).map(|_| RwLock::new(None)).collect(),
        }
    }

    pub fn panel_count(&self) -> usize {
        self.results_stateless.len()
    }

    fn regions(&self, class: RegionClass) -> &[RwLock<Option<String>>] {
        match class {
            RegionClass::LastUpdated => &self.last_updated,
            RegionClass::ResultsStateless => &self.results_stateless,
        }
    }

    pub(crate) fn region(&self, class: RegionClass, index: usize) -> Result<&RwLock<Option<String>>, MissingRegion> {
        self.regions(class)
            .get(index)
            .ok_or(MissingRegion { class, index })
    }

    pub fn ensure_region(&self, class: RegionClass, index: usize) -> Result<(), MissingRegion> {
        self.region(class, index).map(|_| ())
    }

    pub async fn write(
        &self,
        class: RegionClass,
        index: usize,
        content: String,
    ) -> Result<(), MissingRegion> {
        *self.region(class, index)?.write().await = Some(content);
        Ok(())
    }

    pub async fn read(&self, class: RegionClass, index: usize) -> Result<Option<String>, MissingRegion> {
        Ok(self.region(class, index)?.read().await.clone())
    }
}
